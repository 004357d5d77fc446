//! # Guidance collaborators
//!
//! Interfaces between the guidance and the rest of the vehicle. The guidance
//! itself never depends on a transport or viewer, implementations of these
//! traits are given to the `GuidanceDriver` instead.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

use crate::los::{GuidanceCmd, WaypointView};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Provides the vehicle position once per cycle.
pub trait PositionSource {
    /// Latest position in the navigation frame, or `None` if no sample is
    /// available this cycle.
    ///
    /// Detecting stale samples is the responsibility of the source.
    fn position(&mut self) -> Option<Vector2<f64>>;
}

/// Receives the speed and heading demands once per cycle.
pub trait CommandSink {
    fn send(&mut self, cmd: &GuidanceCmd);
}

/// Displays the waypoint sequence.
pub trait VisualisationSink {
    /// Called every cycle the guidance was updated. `switched` is true if a
    /// waypoint was passed this cycle.
    ///
    /// A new sequence can be detected by a change in `view.generation`.
    fn show(&mut self, switched: bool, view: WaypointView<'_>);
}
