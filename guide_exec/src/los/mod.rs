//! # Line-Of-Sight guidance module
//!
//! LOS guidance steers the vehicle along an ordered sequence of waypoints.
//! Each cycle it is given the vehicle's position in the navigation frame and
//! produces a desired speed and heading.
//!
//! The guidance is made up of two parts:
//!
//! - A state machine which tracks the current target waypoint. Each cycle it
//!   applies the switching criterion to the target, and while the criterion is
//!   met it advances to the next waypoint, recalculating the path bearing
//!   (the heading of the segment from the reached waypoint to the new
//!   target). Several closely spaced waypoints can be passed in one cycle.
//!   When the final waypoint is reached the acceptance radius is set to
//!   infinity and the guidance enters its terminal state, from which only a
//!   new waypoint sequence can recover it.
//! - A steering law which calculates the cross-track error (the signed
//!   perpendicular distance to the line through the target along the path
//!   bearing) and corrects the path bearing by the LOS angle
//!   `atan2(-e, lookahead)`.
//!
//! Two switching criteria are available, the circle of acceptance and
//! progress along path. The criterion is chosen when the guidance is built.
//!
//! Headings are not wrapped: the path bearing is in (-pi, pi] and the LOS
//! angle in (-pi/2, pi/2), so the desired heading lies in (-3pi/2, 3pi/2).
//! Consumers which need (-pi, pi] should use `util::maths::wrap_to_pi`.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod controller;
mod params;
mod shared;
mod state;
mod steering;
mod switching;
mod waypoints;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use controller::*;
pub use params::*;
pub use shared::*;
pub use state::*;
pub use steering::*;
pub use switching::*;
pub use waypoints::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during LOS guidance.
#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    /// Guidance was updated before any waypoint sequence was set. This is
    /// expected at startup, the caller should hold and keep polling.
    #[error("No waypoints have been set")]
    NotInitialized,

    /// The configuration was rejected, the previous state is kept.
    #[error("Invalid guidance configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),
}

/// Reasons a waypoint sequence or set of parameters is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Attempted to set an empty waypoint sequence")]
    EmptySequence,

    #[error("Waypoint {0} has a non-finite coordinate")]
    NonFiniteWaypoint(usize),

    #[error("Lookahead distance must be positive and finite, found {0}")]
    InvalidLookahead(f64),

    #[error("Acceptance radius must be non-negative and finite, found {0}")]
    InvalidAcceptanceRadius(f64),

    #[error("Desired speed must be finite, found {0}")]
    InvalidSpeed(f64),
}
