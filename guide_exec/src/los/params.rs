//! LOS guidance parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::{ConfigError, Criterion};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for LOS guidance
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Params {

    /// Radius of acceptance around each waypoint. For the progress criterion
    /// this is the half width of the band perpendicular to the path.
    ///
    /// Units: meters
    pub acceptance_radius_m: f64,

    /// Lookahead distance of the steering law. Shorter distances correct
    /// cross-track error more aggressively.
    ///
    /// Units: meters
    pub lookahead_distance_m: f64,

    /// Speed demand issued while a waypoint is being tracked.
    ///
    /// Units: meters/second
    pub desired_speed_ms: f64,

    /// The criterion used to decide when a waypoint has been reached.
    #[serde(default)]
    pub switch_criterion: Criterion
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the parameters can be used by the guidance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.acceptance_radius_m.is_finite() && self.acceptance_radius_m >= 0.0) {
            return Err(ConfigError::InvalidAcceptanceRadius(self.acceptance_radius_m));
        }

        if !(self.lookahead_distance_m.is_finite() && self.lookahead_distance_m > 0.0) {
            return Err(ConfigError::InvalidLookahead(self.lookahead_distance_m));
        }

        if !self.desired_speed_ms.is_finite() {
            return Err(ConfigError::InvalidSpeed(self.desired_speed_ms));
        }

        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            acceptance_radius_m: 20.0,
            lookahead_distance_m: 20.0,
            desired_speed_ms: 3.0,
            switch_criterion: Criterion::CircleOfAcceptance
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        assert_eq!(Params::default().validate(), Ok(()));

        let p = Params { lookahead_distance_m: 0.0, ..Default::default() };
        assert_eq!(p.validate(), Err(ConfigError::InvalidLookahead(0.0)));

        let p = Params { acceptance_radius_m: -1.0, ..Default::default() };
        assert_eq!(p.validate(), Err(ConfigError::InvalidAcceptanceRadius(-1.0)));

        let p = Params { acceptance_radius_m: f64::INFINITY, ..Default::default() };
        assert!(p.validate().is_err());

        let p = Params { desired_speed_ms: f64::NAN, ..Default::default() };
        assert!(matches!(p.validate(), Err(ConfigError::InvalidSpeed(_))));
    }

    #[test]
    fn test_load_from_toml() {
        let p: Params = util::params::from_str("\
            acceptance_radius_m = 10.0\n\
            lookahead_distance_m = 25.0\n\
            desired_speed_ms = 1.5\n\
            switch_criterion = \"progress\"\n\
        ").unwrap();

        assert_eq!(p, Params {
            acceptance_radius_m: 10.0,
            lookahead_distance_m: 25.0,
            desired_speed_ms: 1.5,
            switch_criterion: Criterion::ProgressAlongPath
        });

        // Criterion defaults to the circle of acceptance
        let p: Params = util::params::from_str("\
            acceptance_radius_m = 10.0\n\
            lookahead_distance_m = 25.0\n\
            desired_speed_ms = 1.5\n\
        ").unwrap();

        assert_eq!(p.switch_criterion, Criterion::CircleOfAcceptance);
    }
}
