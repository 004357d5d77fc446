//! Waypoint sequence tracked by the guidance

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::ConfigError;
use util::raise_error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A waypoint in the navigation frame.
///
/// Units: meters
pub type Waypoint = Vector2<f64>;

/// An ordered, non-empty sequence of waypoints.
///
/// The sequence cannot be modified once built, a new sequence must be set on
/// the guidance instead.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaypointSequence {
    points_m: Vec<Waypoint>,
}

/// A read-only view of the guidance's waypoints for collaborators.
#[derive(Clone, Copy, Debug)]
pub struct WaypointView<'a> {
    /// The sequence being tracked
    pub waypoints: &'a WaypointSequence,

    /// Index of the waypoint currently being tracked
    pub active_index: usize,

    /// Acceptance radius of the waypoints.
    ///
    /// Units: meters
    pub acceptance_radius_m: f64,

    /// Generation of the sequence, see `GuidanceState::generation`
    pub generation: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WaypointSequence {
    /// Build a new sequence.
    ///
    /// The sequence must contain at least one point and all coordinates must
    /// be finite.
    pub fn new(points_m: Vec<Waypoint>) -> Result<Self, ConfigError> {
        if points_m.is_empty() {
            return Err(ConfigError::EmptySequence);
        }

        if let Some(i) = points_m
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(ConfigError::NonFiniteWaypoint(i));
        }

        Ok(Self { points_m })
    }

    /// Build a new sequence from `[x, y]` pairs, as found in parameter files
    /// and telecommands.
    pub fn from_xy(points_m: &[[f64; 2]]) -> Result<Self, ConfigError> {
        Self::new(
            points_m
                .iter()
                .map(|p| Vector2::new(p[0], p[1]))
                .collect(),
        )
    }

    /// Get the waypoint at the given index.
    ///
    /// # Panics
    /// - If the index is out of range. The guidance never holds an index
    ///   outside the sequence so this indicates a programming error.
    pub fn get(&self, index: usize) -> &Waypoint {
        match self.points_m.get(index) {
            Some(p) => p,
            None => raise_error!(
                "Waypoint index {} out of range for a sequence of {} points",
                index,
                self.points_m.len()
            ),
        }
    }

    /// Number of waypoints in the sequence, always at least one.
    pub fn len(&self) -> usize {
        self.points_m.len()
    }

    /// Index of the final waypoint.
    pub fn last_index(&self) -> usize {
        self.points_m.len() - 1
    }

    /// All waypoints in order.
    pub fn points(&self) -> &[Waypoint] {
        &self.points_m
    }

    /// Heading of the segment from the waypoint at `index` to the next one.
    ///
    /// Units: radians, in (-pi, pi]
    pub fn bearing_from(&self, index: usize) -> f64 {
        let from = self.get(index);
        let to = self.get(index + 1);

        (to.y - from.y).atan2(to.x - from.x)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_sequence() {
        assert_eq!(WaypointSequence::new(vec![]), Err(ConfigError::EmptySequence));

        assert_eq!(
            WaypointSequence::from_xy(&[[0.0, 0.0], [f64::NAN, 1.0]]),
            Err(ConfigError::NonFiniteWaypoint(1))
        );

        assert_eq!(
            WaypointSequence::from_xy(&[[0.0, f64::INFINITY]]),
            Err(ConfigError::NonFiniteWaypoint(0))
        );

        let seq = WaypointSequence::from_xy(&[[50.0, 50.0]]).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.last_index(), 0);
        assert_eq!(*seq.get(0), Vector2::new(50.0, 50.0));
    }

    #[test]
    fn test_bearing_from() {
        let seq = WaypointSequence::from_xy(&[
            [50.0, 50.0],
            [120.0, 70.0],
            [120.0, 0.0],
            [0.0, 0.0]
        ]).unwrap();

        assert_eq!(seq.bearing_from(0), 20f64.atan2(70.0));
        assert_eq!(seq.bearing_from(1), -std::f64::consts::FRAC_PI_2);
        assert_eq!(seq.bearing_from(2), std::f64::consts::PI);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_access() {
        let seq = WaypointSequence::from_xy(&[[0.0, 0.0], [10.0, 0.0]]).unwrap();

        seq.get(2);
    }

    #[test]
    #[should_panic]
    fn test_bearing_from_last() {
        let seq = WaypointSequence::from_xy(&[[0.0, 0.0], [10.0, 0.0]]).unwrap();

        seq.bearing_from(1);
    }
}
