//! # Guidance Executable Parameters
//!
//! This module provides parameters for the guidance executable.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::sim_vehicle::SimVehicleParams;

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideExecParams {
    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Maximum number of cycles to run for, unlimited if not given
    #[serde(default)]
    pub max_cycles: Option<u64>,

    /// Waypoints to track from the start of execution, as `[x, y]` pairs. If
    /// empty the exec waits for a script to provide them.
    ///
    /// Units: meters
    #[serde(default)]
    pub initial_waypoints_m: Vec<[f64; 2]>,

    /// Script to execute, relative to the software root. Overriden by the
    /// command line argument.
    #[serde(default)]
    pub script_path: Option<String>,

    /// Simulated vehicle closing the loop
    #[serde(default)]
    pub sim: SimVehicleParams,
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_exec_params() {
        let p: GuideExecParams = util::params::from_str(r#"
            cycle_period_s = 0.1
            initial_waypoints_m = [[50.0, 50.0], [120.0, 70.0]]

            [sim]
            initial_position_m = [0.0, 0.0]
            initial_heading_rad = 0.0
            max_turn_rate_rads = 0.5
        "#).unwrap();

        assert_eq!(p.cycle_period_s, 0.1);
        assert_eq!(p.max_cycles, None);
        assert_eq!(p.initial_waypoints_m.len(), 2);
        assert!(p.script_path.is_none());
        assert_eq!(p.sim.max_turn_rate_rads, 0.5);

        let p: GuideExecParams = util::params::from_str(
            "cycle_period_s = 0.5\nmax_cycles = 10\nscript_path = \"scripts/demo.gsc\""
        ).unwrap();

        assert_eq!(p.max_cycles, Some(10));
        assert!(p.initial_waypoints_m.is_empty());
        assert_eq!(p.script_path.as_deref(), Some("scripts/demo.gsc"));
    }
}
