//! # Waypoint markers
//!
//! Draws the waypoint sequence as a set of cylinder markers, one per
//! waypoint, with a diameter equal to the acceptance circle. The waypoint
//! being tracked is drawn green, all others red.
//!
//! All markers are drawn on the first cycle after a sequence is set, after
//! that only the markers whose colour changed are redrawn when a switch
//! occurs. A new sequence is recognised by its generation, so sequences set
//! through any handle to the guidance are redrawn.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::Serialize;

// Internal
use util::archive::Archiver;
use crate::collab::VisualisationSink;
use crate::los::WaypointView;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Height of the waypoint cylinders
pub const MARKER_HEIGHT_M: f64 = 2.0;

/// Opacity of the waypoint cylinders
pub const MARKER_ALPHA: f32 = 0.3;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single waypoint marker.
///
/// Flat so that it can be archived as a CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    /// Index of the waypoint, unique within the sequence
    pub id: usize,

    pub x_m: f64,
    pub y_m: f64,

    pub diameter_m: f64,
    pub height_m: f64,

    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,

    pub active: bool,
}

/// Visualisation sink drawing waypoint markers into a `MarkerSink`.
#[derive(Debug)]
pub struct WaypointMarkers<S> {
    sink: S,

    /// Generation of the sequence last drawn, `None` before the first draw
    generation: Option<u64>,

    /// Active index when the markers were last drawn
    last_active: usize,
}

/// Marker sink which archives every marker to CSV.
#[derive(Default)]
pub struct ArchiveMarkerSink {
    archiver: Archiver,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Something which can display markers, such as a viewer connection.
pub trait MarkerSink {
    /// Draw or replace the marker with the same id.
    fn publish(&mut self, marker: &Marker);
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Marker {
    /// Build the marker for waypoint `index` of the view.
    pub fn from_view(view: &WaypointView<'_>, index: usize) -> Self {
        let point = view.waypoints.get(index);
        let active = index == view.active_index;

        let (r, g) = match active {
            true => (0.0, 1.0),
            false => (1.0, 0.0),
        };

        Self {
            id: index,
            x_m: point.x,
            y_m: point.y,
            diameter_m: 2.0 * view.acceptance_radius_m,
            height_m: MARKER_HEIGHT_M,
            r,
            g,
            b: 0.0,
            a: MARKER_ALPHA,
            active,
        }
    }
}

impl<S: MarkerSink> WaypointMarkers<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            generation: None,
            last_active: 0,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn draw(&mut self, view: &WaypointView<'_>, index: usize) {
        let marker = Marker::from_view(view, index);
        self.sink.publish(&marker);
    }
}

impl<S: MarkerSink> VisualisationSink for WaypointMarkers<S> {
    fn show(&mut self, switched: bool, view: WaypointView<'_>) {
        if self.generation != Some(view.generation) {
            for i in 0..view.waypoints.len() {
                self.draw(&view, i);
            }
            self.generation = Some(view.generation);
        }
        else if switched {
            // Several waypoints may have been passed in one cycle, redraw all
            // of them as well as the new active one.
            let first = self.last_active.min(view.active_index);
            for i in first..=view.active_index {
                self.draw(&view, i);
            }
        }

        self.last_active = view.active_index;
    }
}

impl ArchiveMarkerSink {
    pub fn new(archiver: Archiver) -> Self {
        Self { archiver }
    }
}

impl MarkerSink for ArchiveMarkerSink {
    fn publish(&mut self, marker: &Marker) {
        debug!(
            "Marker {}: ({:.2}, {:.2}), active: {}",
            marker.id, marker.x_m, marker.y_m, marker.active
        );

        if let Err(e) = self.archiver.serialise(marker) {
            warn!("Could not archive marker {}: {}", marker.id, e);
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::los::WaypointSequence;

    #[derive(Default)]
    struct Recorder(Vec<Marker>);

    impl MarkerSink for Recorder {
        fn publish(&mut self, marker: &Marker) {
            self.0.push(*marker);
        }
    }

    fn view(seq: &WaypointSequence, active_index: usize) -> WaypointView<'_> {
        WaypointView {
            waypoints: seq,
            active_index,
            acceptance_radius_m: 5.0,
            generation: 1,
        }
    }

    fn ids(markers: &[Marker]) -> Vec<usize> {
        markers.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_marker_style() {
        let seq = WaypointSequence::from_xy(&[[50.0, 50.0], [120.0, 70.0]]).unwrap();

        let active = Marker::from_view(&view(&seq, 0), 0);
        assert_eq!(active.diameter_m, 10.0);
        assert_eq!(active.height_m, 2.0);
        assert_eq!((active.r, active.g, active.b, active.a), (0.0, 1.0, 0.0, 0.3));
        assert!(active.active);

        let other = Marker::from_view(&view(&seq, 0), 1);
        assert_eq!((other.x_m, other.y_m), (120.0, 70.0));
        assert_eq!((other.r, other.g), (1.0, 0.0));
        assert!(!other.active);
    }

    #[test]
    fn test_draw_sequence() {
        let seq = WaypointSequence::from_xy(
            &[[0.0, 0.0], [10.0, 0.0], [20.0, 0.0], [30.0, 0.0]]
        ).unwrap();
        let mut markers = WaypointMarkers::new(Recorder::default());

        // First draw: everything, the first waypoint is active
        markers.show(false, view(&seq, 0));
        assert_eq!(ids(&markers.sink().0), vec![0, 1, 2, 3]);
        assert!(markers.sink().0[0].active);

        // Nothing new without a switch
        markers.show(false, view(&seq, 0));
        assert_eq!(markers.sink().0.len(), 4);

        // Switch: previous and new active
        markers.show(true, view(&seq, 1));
        assert_eq!(ids(&markers.sink().0[4..]), vec![0, 1]);
        assert!(!markers.sink().0[4].active);
        assert!(markers.sink().0[5].active);

        // Multiple waypoints passed in one cycle
        markers.show(true, view(&seq, 3));
        assert_eq!(ids(&markers.sink().0[6..]), vec![1, 2, 3]);

        // A new sequence draws everything again, even if it is identical
        markers.show(false, WaypointView { generation: 2, ..view(&seq, 0) });
        assert_eq!(ids(&markers.sink().0[9..]), vec![0, 1, 2, 3]);
        assert!(markers.sink().0[9].active);

        // A switch in the new sequence redraws from its own start
        markers.show(true, WaypointView { generation: 2, ..view(&seq, 1) });
        assert_eq!(ids(&markers.sink().0[13..]), vec![0, 1]);
    }
}
