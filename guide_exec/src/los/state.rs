//! Guidance state machine

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use nalgebra::Vector2;

// Internal
use super::{GuidanceError, Params, SwitchingCriterion, Waypoint, WaypointSequence};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The mutable state of the LOS guidance.
///
/// Only the state machine (`advance`) and the configuration entry point
/// (`set_waypoints`) modify the state.
#[derive(Debug, Clone)]
pub struct GuidanceState {
    /// The sequence being tracked, `None` until the first sequence is set.
    waypoints: Option<WaypointSequence>,

    /// Index of the target waypoint. Never decreases for a given sequence.
    current_index: usize,

    /// Heading of the segment ending at the target.
    ///
    /// Units: radians
    path_bearing_rad: f64,

    /// Squared acceptance radius. Set to infinity on reaching the final
    /// waypoint.
    ///
    /// Units: meters^2
    acceptance_radius_sq_m2: f64,

    /// Squared acceptance radius from the parameters, restored when a new
    /// sequence is set.
    ///
    /// Units: meters^2
    nominal_radius_sq_m2: f64,

    /// Units: meters
    lookahead_distance_m: f64,

    /// Units: meters/second
    desired_speed_ms: f64,

    /// Incremented each time a new sequence is set
    generation: u64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Result of running the state machine for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A target is being tracked. `switched` is true if at least one waypoint
    /// was passed this cycle.
    Tracking { switched: bool },

    /// The final waypoint has been reached, no command should be issued.
    MissionComplete,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GuidanceState {
    /// Create a new uninitialised state from the given parameters.
    pub(crate) fn new(params: &Params) -> Self {
        let radius_sq_m2 = params.acceptance_radius_m.powi(2);

        Self {
            waypoints: None,
            current_index: 0,
            path_bearing_rad: 0.0,
            acceptance_radius_sq_m2: radius_sq_m2,
            nominal_radius_sq_m2: radius_sq_m2,
            lookahead_distance_m: params.lookahead_distance_m,
            desired_speed_ms: params.desired_speed_ms,
            generation: 0,
        }
    }

    /// Replace the tracked sequence, restarting from its first waypoint.
    ///
    /// This also leaves the terminal state. The path bearing is reset to zero
    /// and is recalculated on the first switch.
    pub(crate) fn set_waypoints(&mut self, waypoints: WaypointSequence) {
        self.waypoints = Some(waypoints);
        self.current_index = 0;
        self.path_bearing_rad = 0.0;
        self.acceptance_radius_sq_m2 = self.nominal_radius_sq_m2;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Run the switching logic for the vehicle at `position_m`.
    ///
    /// While `criterion` is met for the target the index is advanced,
    /// recalculating the path bearing each time. Reaching the final waypoint
    /// puts the state into its terminal condition, after which
    /// `MissionComplete` is returned without evaluating the criterion.
    pub(crate) fn advance(
        &mut self,
        position_m: &Vector2<f64>,
        criterion: &dyn SwitchingCriterion,
    ) -> Result<Advance, GuidanceError> {
        if self.waypoints.is_none() {
            return Err(GuidanceError::NotInitialized);
        }

        if self.is_terminal() {
            return Ok(Advance::MissionComplete);
        }

        let mut switched = false;

        while criterion.reached(position_m, self) {
            let waypoints = match self.waypoints {
                Some(ref w) => w,
                None => return Err(GuidanceError::NotInitialized),
            };
            let reached = waypoints.get(self.current_index);

            info!(
                "Waypoint {}: ({:.2}, {:.2}) reached!",
                self.current_index, reached.x, reached.y
            );

            if self.current_index < waypoints.last_index() {
                self.path_bearing_rad = waypoints.bearing_from(self.current_index);
                self.current_index += 1;
                switched = true;
            } else {
                info!("Last waypoint reached!");

                // The criterion can never be met again
                self.acceptance_radius_sq_m2 = f64::INFINITY;

                return Ok(Advance::MissionComplete);
            }
        }

        Ok(Advance::Tracking { switched })
    }

    /// Returns true if waypoints have been set.
    pub fn is_initialized(&self) -> bool {
        self.waypoints.is_some()
    }

    /// Returns true once the final waypoint has been reached.
    pub fn is_terminal(&self) -> bool {
        self.acceptance_radius_sq_m2.is_infinite()
    }

    /// The waypoint currently being tracked, or `None` if uninitialised.
    pub fn target(&self) -> Option<&Waypoint> {
        self.waypoints
            .as_ref()
            .map(|w| w.get(self.current_index))
    }

    pub fn waypoints(&self) -> Option<&WaypointSequence> {
        self.waypoints.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn path_bearing_rad(&self) -> f64 {
        self.path_bearing_rad
    }

    pub fn acceptance_radius_sq_m2(&self) -> f64 {
        self.acceptance_radius_sq_m2
    }

    pub fn acceptance_radius_m(&self) -> f64 {
        self.acceptance_radius_sq_m2.sqrt()
    }

    /// Acceptance radius from the parameters, unaffected by the terminal
    /// state.
    pub fn nominal_radius_m(&self) -> f64 {
        self.nominal_radius_sq_m2.sqrt()
    }

    pub fn lookahead_distance_m(&self) -> f64 {
        self.lookahead_distance_m
    }

    pub fn desired_speed_ms(&self) -> f64 {
        self.desired_speed_ms
    }

    /// Identifies the sequence being tracked, changes every time a sequence
    /// is set even if it is identical to the previous one.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
