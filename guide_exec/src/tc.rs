//! # Guidance telecommands
//!
//! Commands which can be issued to the guidance exec, typically from a
//! timestamped script.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::los::Waypoint;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand for the guidance exec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GuidanceTc {
    /// Replace the waypoint sequence being tracked.
    SetWaypoints {
        /// Waypoints as `[x, y]` pairs
        ///
        /// Units: meters
        waypoints_m: Vec<[f64; 2]>
    },

    /// Stop the exec.
    Stop,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GuidanceTc {
    /// Convert `[x, y]` pairs into waypoints.
    pub fn to_waypoints(points_m: &[[f64; 2]]) -> Vec<Waypoint> {
        points_m
            .iter()
            .map(|p| Waypoint::new(p[0], p[1]))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
