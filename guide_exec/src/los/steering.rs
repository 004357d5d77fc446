//! LOS steering law

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Quantities calculated by the steering law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    /// Signed perpendicular distance from the vehicle to the path line,
    /// positive to the left of the path.
    ///
    /// Units: meters
    pub cross_track_error_m: f64,

    /// Correction applied to the path bearing.
    ///
    /// Units: radians
    pub los_angle_rad: f64,

    /// Desired heading, path bearing plus the LOS angle. Not wrapped.
    ///
    /// Units: radians
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Cross-track error of the vehicle relative to the line through `target_m`
/// with heading `path_bearing_rad`.
///
/// Eq. (10.10), Fossen (2011).
pub fn cross_track_error(
    position_m: &Vector2<f64>,
    target_m: &Vector2<f64>,
    path_bearing_rad: f64,
) -> f64 {
    -(position_m.x - target_m.x) * path_bearing_rad.sin()
        + (position_m.y - target_m.y) * path_bearing_rad.cos()
}

/// LOS correction angle for the given cross-track error. A positive error
/// gives a negative correction.
pub fn los_angle(cross_track_error_m: f64, lookahead_distance_m: f64) -> f64 {
    (-cross_track_error_m).atan2(lookahead_distance_m)
}

/// Run the steering law.
pub fn steer(
    position_m: &Vector2<f64>,
    target_m: &Vector2<f64>,
    path_bearing_rad: f64,
    lookahead_distance_m: f64,
) -> Steering {
    let cross_track_error_m = cross_track_error(position_m, target_m, path_bearing_rad);
    let los_angle_rad = los_angle(cross_track_error_m, lookahead_distance_m);

    Steering {
        cross_track_error_m,
        los_angle_rad,
        heading_rad: path_bearing_rad + los_angle_rad,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    const EPS: f64 = 1e-12;

    #[test]
    fn test_lateral_offset_due_east() {
        let s = steer(&Vector2::new(30.0, 5.0), &Vector2::new(100.0, 0.0), 0.0, 20.0);

        assert_eq!(s.cross_track_error_m, 5.0);
        assert_eq!(s.los_angle_rad, (-5f64).atan2(20.0));
        assert_eq!(s.heading_rad, s.los_angle_rad);
        assert!(s.heading_rad < 0.0);
    }

    #[test]
    fn test_error_sign_and_zero_on_line() {
        let target = Vector2::new(10.0, 10.0);

        // Path heading north east through the target
        let on_line = cross_track_error(&Vector2::new(-3.0, -3.0), &target, FRAC_PI_4);
        let left = cross_track_error(&Vector2::new(0.0, 2.0), &target, FRAC_PI_4);
        let right = cross_track_error(&Vector2::new(2.0, 0.0), &target, FRAC_PI_4);

        assert!(on_line.abs() < EPS);
        assert!(left > 0.0);
        assert!(right < 0.0);
        assert!((left + right).abs() < EPS);
        assert!((left - 2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_on_path_heading_is_bearing() {
        let s = steer(&Vector2::new(0.0, -50.0), &Vector2::new(0.0, 0.0), FRAC_PI_2, 20.0);

        assert!(s.cross_track_error_m.abs() < EPS);
        assert!((s.heading_rad - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_los_angle_limits() {
        assert!(los_angle(1e9, 20.0) > -FRAC_PI_2);
        assert!((los_angle(1e9, 20.0) + FRAC_PI_2).abs() < 1e-6);
        assert_eq!(los_angle(0.0, 20.0), 0.0);
    }
}
