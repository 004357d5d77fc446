//! LOS guidance controller
//!
//! `LosGuidance` owns the guidance state and the switching criterion, and is
//! the only way collaborators can modify them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::fmt;
use log::{info, trace, warn};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::*;
use util::{
    archive::{Archived, Archiver, ArchiveError},
    module::State,
    params,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// LOS guidance controller.
#[derive(Debug)]
pub struct LosGuidance {
    params: Params,

    criterion: Box<dyn SwitchingCriterion>,

    state: GuidanceState,

    report: StatusReport,

    arch_report: ArchiverSlot,
}

/// The command produced by the guidance each cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GuidanceCmd {
    /// Units: meters/second
    pub speed_ms: f64,

    /// Units: radians
    pub heading_rad: f64,

    /// True if at least one waypoint was passed this cycle.
    pub switched: bool,
}

/// Input data to LOS guidance.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    /// Vehicle position in the navigation frame.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,
}

/// Status report for LOS guidance processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Index of the target waypoint
    pub target_index: usize,

    /// Units: radians
    pub path_bearing_rad: f64,

    /// Units: meters
    pub cross_track_error_m: f64,

    /// Units: radians
    pub los_angle_rad: f64,

    /// Distance from the vehicle to the target waypoint.
    ///
    /// Units: meters
    pub dist_to_target_m: f64,

    /// True if at least one waypoint was passed this cycle
    pub switched: bool,

    /// True once the final waypoint has been reached
    pub mission_complete: bool,
}

/// Wraps the archiver so the controller can still derive `Debug`.
#[derive(Default)]
struct ArchiverSlot(Archiver);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GuidanceCmd {
    /// The command issued when there is nothing to track: zero speed and
    /// zero heading.
    pub const NONE: GuidanceCmd = GuidanceCmd {
        speed_ms: 0.0,
        heading_rad: 0.0,
        switched: false,
    };
}

impl LosGuidance {
    /// Create a new uninitialised guidance using the criterion selected in
    /// the parameters.
    pub fn new(params: Params) -> Result<Self, GuidanceError> {
        let criterion = params.switch_criterion.build();

        Self::build(params, criterion)
    }

    /// Create a new uninitialised guidance with a custom switching criterion.
    ///
    /// The `switch_criterion` parameter is ignored.
    pub fn with_criterion<C>(params: Params, criterion: C) -> Result<Self, GuidanceError>
    where
        C: SwitchingCriterion + 'static
    {
        Self::build(params, Box::new(criterion))
    }

    fn build(
        params: Params,
        criterion: Box<dyn SwitchingCriterion>
    ) -> Result<Self, GuidanceError> {
        params.validate()?;

        Ok(Self {
            state: GuidanceState::new(&params),
            params,
            criterion,
            report: StatusReport::default(),
            arch_report: ArchiverSlot::default(),
        })
    }

    /// Set a new waypoint sequence from a list of points.
    ///
    /// Tracking restarts at the first point of the new sequence. If the points
    /// are rejected the current state is kept unchanged.
    pub fn set_waypoints(&mut self, points_m: Vec<Waypoint>) -> Result<(), GuidanceError> {
        match WaypointSequence::new(points_m) {
            Ok(seq) => {
                self.set_waypoint_sequence(seq);
                Ok(())
            },
            Err(e) => {
                warn!("Rejected new waypoint sequence: {}", e);
                Err(GuidanceError::InvalidConfiguration(e))
            }
        }
    }

    /// Set a new, already validated, waypoint sequence.
    pub fn set_waypoint_sequence(&mut self, seq: WaypointSequence) {
        info!("New sequence of {} waypoints set", seq.len());

        self.state.set_waypoints(seq);
        self.report = StatusReport::default();
    }

    /// Calculate the guidance command for the vehicle at `(x, y)`.
    ///
    /// # Outputs
    /// - `Err(NotInitialized)` if no waypoints have been set. The caller
    ///   should issue `GuidanceCmd::NONE` and keep polling.
    /// - `Ok(GuidanceCmd::NONE)` once the mission is complete.
    /// - Otherwise the desired speed and heading.
    pub fn update(&mut self, x: f64, y: f64) -> Result<GuidanceCmd, GuidanceError> {
        let position_m = Vector2::new(x, y);

        self.report = StatusReport::default();

        let switched = match self.state.advance(&position_m, self.criterion.as_ref())? {
            Advance::Tracking { switched } => switched,
            Advance::MissionComplete => {
                self.report.target_index = self.state.current_index();
                self.report.path_bearing_rad = self.state.path_bearing_rad();
                self.report.mission_complete = true;
                return Ok(GuidanceCmd::NONE);
            }
        };

        let target_m = match self.state.target() {
            Some(t) => *t,
            None => return Err(GuidanceError::NotInitialized),
        };

        let steering = steer(
            &position_m,
            &target_m,
            self.state.path_bearing_rad(),
            self.state.lookahead_distance_m(),
        );

        self.report = StatusReport {
            target_index: self.state.current_index(),
            path_bearing_rad: self.state.path_bearing_rad(),
            cross_track_error_m: steering.cross_track_error_m,
            los_angle_rad: steering.los_angle_rad,
            dist_to_target_m: (target_m - position_m).norm(),
            switched,
            mission_complete: false,
        };

        trace!(
            "LOS: target {}, e = {:.3} m, Xr = {:.4} rad, psi_d = {:.4} rad",
            self.report.target_index,
            steering.cross_track_error_m,
            steering.los_angle_rad,
            steering.heading_rad
        );

        Ok(GuidanceCmd {
            speed_ms: self.state.desired_speed_ms(),
            heading_rad: steering.heading_rad,
            switched,
        })
    }

    /// Read-only view of the waypoints for visualisation, `None` if no
    /// waypoints have been set.
    pub fn view(&self) -> Option<WaypointView<'_>> {
        self.state.waypoints().map(|waypoints| WaypointView {
            waypoints,
            active_index: self.state.current_index(),
            acceptance_radius_m: self.state.nominal_radius_m(),
            generation: self.state.generation(),
        })
    }

    pub fn state(&self) -> &GuidanceState {
        &self.state
    }

    pub fn waypoints(&self) -> Option<&WaypointSequence> {
        self.state.waypoints()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Report from the last call to `update`.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    pub fn is_mission_complete(&self) -> bool {
        self.state.is_terminal()
    }
}

impl Default for LosGuidance {
    fn default() -> Self {
        let params = Params::default();

        Self {
            state: GuidanceState::new(&params),
            criterion: params.switch_criterion.build(),
            params,
            report: StatusReport::default(),
            arch_report: ArchiverSlot::default(),
        }
    }
}

impl fmt::Display for LosGuidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Radius: {}", self.params.acceptance_radius_m)?;
        writeln!(f, "Lookahead distance: {}", self.params.lookahead_distance_m)?;
        write!(f, "Current waypoint: {}", self.state.current_index())
    }
}

impl State for LosGuidance {
    type InitData = &'static str;
    type InitError = GuidanceError;

    type InputData = InputData;
    type OutputData = GuidanceCmd;
    type StatusReport = StatusReport;
    type ProcError = GuidanceError;

    /// Initialise the guidance.
    ///
    /// Expected init data is the path to the parameter file. Any waypoints
    /// already set are discarded.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(init_data)
            .map_err(GuidanceError::ParamLoadError)?;

        let mut new = Self::new(params)?;

        // A missing archive shouldn't stop guidance
        match Archiver::from_path(session, "los_guidance/status_report.csv") {
            Ok(a) => new.arch_report = ArchiverSlot(a),
            Err(e) => warn!("Could not create the LOS guidance archive: {}", e)
        }

        *self = new;

        Ok(())
    }

    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let cmd = self.update(input_data.position_m.x, input_data.position_m.y)?;

        Ok((cmd, self.report))
    }
}

impl Archived for LosGuidance {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.0.serialise(self.report)
    }
}

impl fmt::Debug for ArchiverSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Archiver")
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
