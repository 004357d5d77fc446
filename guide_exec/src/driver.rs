//! # Guidance driver
//!
//! Runs one guidance cycle: acquire the position, update the guidance, then
//! pass the command and waypoints on to the collaborators.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};

// Internal
use crate::collab::{CommandSink, PositionSource, VisualisationSink};
use crate::los::{GuidanceCmd, GuidanceError, SharedGuidance, StatusReport, Waypoint};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drives a shared guidance with the given collaborators.
pub struct GuidanceDriver<P, C, V> {
    guidance: SharedGuidance,

    source: P,
    cmd_sink: C,
    vis_sink: V,

    /// Number of cycles in which a switch occured
    num_switches: usize,

    last_report: StatusReport,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The outcome of a single cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No position was available, nothing was commanded.
    NoPosition,

    /// No waypoints are set, the no-command demand was issued.
    NotInitialized,

    /// The guidance is tracking a waypoint and issued this command.
    Commanded(GuidanceCmd),

    /// The final waypoint has been reached, the no-command demand was issued.
    MissionComplete,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<P, C, V> GuidanceDriver<P, C, V>
where
    P: PositionSource,
    C: CommandSink,
    V: VisualisationSink,
{
    pub fn new(guidance: SharedGuidance, source: P, cmd_sink: C, vis_sink: V) -> Self {
        Self {
            guidance,
            source,
            cmd_sink,
            vis_sink,
            num_switches: 0,
            last_report: StatusReport::default(),
        }
    }

    /// Set a new waypoint sequence.
    ///
    /// Equivalent to setting the sequence through any other handle to the
    /// shared guidance.
    pub fn set_waypoints(&mut self, points_m: Vec<Waypoint>) -> Result<(), GuidanceError> {
        self.guidance.set_waypoints(points_m)
    }

    /// Run one cycle.
    ///
    /// Only errors other than `NotInitialized` are returned, which is reported
    /// as an outcome since it is expected until the first waypoints arrive.
    pub fn tick(&mut self) -> Result<TickOutcome, GuidanceError> {
        let position_m = match self.source.position() {
            Some(p) => p,
            None => {
                debug!("No position available, skipping guidance");
                return Ok(TickOutcome::NoPosition);
            }
        };

        // The waypoints are shown under the same lock as the update so that a
        // concurrent reconfiguration can't be drawn with this cycle's command
        let vis_sink = &mut self.vis_sink;
        let (cmd, report) = match self.guidance.update_with_view(
            position_m.x,
            position_m.y,
            |cmd, view| vis_sink.show(cmd.switched, view)
        ) {
            Ok(r) => r,
            Err(GuidanceError::NotInitialized) => {
                self.cmd_sink.send(&GuidanceCmd::NONE);
                self.last_report = StatusReport::default();
                return Ok(TickOutcome::NotInitialized);
            }
            Err(e) => return Err(e),
        };

        self.cmd_sink.send(&cmd);

        if cmd.switched {
            info!("Switched! Now tracking waypoint {}", report.target_index);
            self.num_switches += 1;
        }

        self.last_report = report;

        if report.mission_complete {
            Ok(TickOutcome::MissionComplete)
        } else {
            Ok(TickOutcome::Commanded(cmd))
        }
    }

    pub fn guidance(&self) -> &SharedGuidance {
        &self.guidance
    }

    pub fn num_switches(&self) -> usize {
        self.num_switches
    }

    /// Report from the last cycle in which the guidance was updated.
    pub fn last_report(&self) -> StatusReport {
        self.last_report
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn cmd_sink(&self) -> &C {
        &self.cmd_sink
    }

    pub fn vis_sink(&self) -> &V {
        &self.vis_sink
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::los::{LosGuidance, Params, WaypointView};
    use crate::markers::{Marker, MarkerSink, WaypointMarkers};
    use nalgebra::Vector2;
    use std::collections::VecDeque;

    struct ScriptedSource(VecDeque<Option<Vector2<f64>>>);

    impl PositionSource for ScriptedSource {
        fn position(&mut self) -> Option<Vector2<f64>> {
            self.0.pop_front().flatten()
        }
    }

    #[derive(Default)]
    struct RecordingSink(Vec<GuidanceCmd>);

    impl CommandSink for RecordingSink {
        fn send(&mut self, cmd: &GuidanceCmd) {
            self.0.push(*cmd);
        }
    }

    /// Records (switched, active index, number of waypoints, generation)
    #[derive(Default)]
    struct RecordingVis(Vec<(bool, usize, usize, u64)>);

    impl VisualisationSink for RecordingVis {
        fn show(&mut self, switched: bool, view: WaypointView<'_>) {
            self.0.push((
                switched,
                view.active_index,
                view.waypoints.len(),
                view.generation
            ));
        }
    }

    #[derive(Default)]
    struct MarkerRecorder(Vec<Marker>);

    impl MarkerSink for MarkerRecorder {
        fn publish(&mut self, marker: &Marker) {
            self.0.push(*marker);
        }
    }

    fn guidance(radius_m: f64) -> SharedGuidance {
        SharedGuidance::new(LosGuidance::new(Params {
            acceptance_radius_m: radius_m,
            ..Default::default()
        }).unwrap())
    }

    fn source(positions: Vec<Option<Vector2<f64>>>) -> ScriptedSource {
        ScriptedSource(positions.into())
    }

    fn driver(
        positions: Vec<Option<Vector2<f64>>>
    ) -> GuidanceDriver<ScriptedSource, RecordingSink, RecordingVis> {
        GuidanceDriver::new(
            guidance(2.0),
            source(positions),
            RecordingSink::default(),
            RecordingVis::default(),
        )
    }

    #[test]
    fn test_tick_sequence() {
        let mut d = driver(vec![
            Some(Vector2::new(0.0, 0.0)),
            None,
            Some(Vector2::new(0.0, 0.0)),
            Some(Vector2::new(5.0, 1.0)),
            Some(Vector2::new(10.0, 0.5)),
            Some(Vector2::new(0.0, 0.0)),
        ]);

        assert_eq!(d.tick().unwrap(), TickOutcome::NotInitialized);
        assert!(d.vis_sink().0.is_empty());

        d.set_waypoints(vec![Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)]).unwrap();

        assert_eq!(d.tick().unwrap(), TickOutcome::NoPosition);

        match d.tick().unwrap() {
            TickOutcome::Commanded(cmd) => assert!(cmd.switched),
            o => panic!("Unexpected outcome {:?}", o),
        }

        match d.tick().unwrap() {
            TickOutcome::Commanded(cmd) => {
                assert!(!cmd.switched);
                assert_eq!(cmd.heading_rad, (-1f64).atan2(20.0));
            },
            o => panic!("Unexpected outcome {:?}", o),
        }

        assert_eq!(d.tick().unwrap(), TickOutcome::MissionComplete);
        assert_eq!(d.tick().unwrap(), TickOutcome::MissionComplete);

        assert_eq!(d.num_switches(), 1);
        assert!(d.last_report().mission_complete);

        // The no-command demand is sent when uninitialised and once complete
        let sent = &d.cmd_sink().0;
        assert_eq!(sent.len(), 5);
        assert_eq!(sent[0], GuidanceCmd::NONE);
        assert_eq!(sent[3], GuidanceCmd::NONE);
        assert_eq!(sent[4], GuidanceCmd::NONE);

        assert_eq!(
            d.vis_sink().0,
            vec![(true, 1, 2, 1), (false, 1, 2, 1), (false, 1, 2, 1), (false, 1, 2, 1)]
        );
    }

    #[test]
    fn test_rejected_waypoints_keep_sequence() {
        let mut d = driver(vec![Some(Vector2::new(50.0, 0.0))]);

        d.set_waypoints(vec![Vector2::new(100.0, 0.0)]).unwrap();
        assert!(d.set_waypoints(vec![]).is_err());

        assert!(matches!(d.tick().unwrap(), TickOutcome::Commanded(_)));
        assert_eq!(d.vis_sink().0, vec![(false, 0, 1, 1)]);
    }

    #[test]
    fn test_reconfiguration_from_shared_handle_redraws_markers() {
        let shared = guidance(2.0);
        let mut d = GuidanceDriver::new(
            shared.clone(),
            source(vec![Some(Vector2::new(50.0, 0.0)); 3]),
            RecordingSink::default(),
            WaypointMarkers::new(MarkerRecorder::default()),
        );

        d.set_waypoints(vec![Vector2::new(0.0, 0.0), Vector2::new(100.0, 0.0)]).unwrap();
        d.tick().unwrap();
        assert_eq!(d.vis_sink().sink().0.len(), 2);

        // Reconfigure as another thread would, bypassing the driver
        let config = shared.clone();
        config.set_waypoints(vec![
            Vector2::new(200.0, 0.0),
            Vector2::new(300.0, 0.0),
            Vector2::new(400.0, 0.0),
        ]).unwrap();

        d.tick().unwrap();
        d.tick().unwrap();

        let new_markers = &d.vis_sink().sink().0[2..];
        let ids: Vec<usize> = new_markers.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(new_markers[2].x_m, 400.0);
        assert!(new_markers[0].active);
    }
}
