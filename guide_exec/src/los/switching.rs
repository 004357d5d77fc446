//! Waypoint switching criteria
//!
//! A switching criterion decides whether the vehicle has reached the target
//! waypoint. It only reads the guidance state.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use super::GuidanceState;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Test for whether the vehicle has reached the current target waypoint.
pub trait SwitchingCriterion: std::fmt::Debug + Send {
    /// Returns true if the vehicle at `position_m` has reached the target of
    /// `state`.
    ///
    /// If the state has no target (no waypoints set) this returns false.
    fn reached(&self, position_m: &Vector2<f64>, state: &GuidanceState) -> bool;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The target is reached when the vehicle is strictly inside the circle of
/// acceptance around it.
#[derive(Debug, Default, Clone, Copy)]
pub struct CircleOfAcceptance;

/// The target is reached when the vehicle is within one acceptance radius of
/// the target, measured along the path bearing only.
///
/// This is a crossing test against a band perpendicular to the path rather
/// than a circle, so a vehicle which is far off the path still switches when
/// it draws level with the target. Better suited to widely spaced waypoints.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgressAlongPath;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Selects the switching criterion to use when building the guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criterion {
    #[serde(rename = "circle")]
    CircleOfAcceptance,

    #[serde(rename = "progress")]
    ProgressAlongPath,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SwitchingCriterion for CircleOfAcceptance {
    fn reached(&self, position_m: &Vector2<f64>, state: &GuidanceState) -> bool {
        match state.target() {
            Some(target) => (position_m - target).norm_squared() < state.acceptance_radius_sq_m2(),
            None => false,
        }
    }
}

impl SwitchingCriterion for ProgressAlongPath {
    fn reached(&self, position_m: &Vector2<f64>, state: &GuidanceState) -> bool {
        let target = match state.target() {
            Some(t) => t,
            None => return false,
        };

        let bearing = state.path_bearing_rad();
        let to_target = target - position_m;
        let along_track_m = to_target.x * bearing.cos() + to_target.y * bearing.sin();

        along_track_m.abs() < state.acceptance_radius_sq_m2().sqrt()
    }
}

impl Criterion {
    /// Build the criterion this variant selects.
    pub fn build(self) -> Box<dyn SwitchingCriterion> {
        match self {
            Criterion::CircleOfAcceptance => Box::new(CircleOfAcceptance),
            Criterion::ProgressAlongPath => Box::new(ProgressAlongPath),
        }
    }
}

impl Default for Criterion {
    fn default() -> Self {
        Criterion::CircleOfAcceptance
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
