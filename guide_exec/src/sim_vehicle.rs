//! # Simulated vehicle
//!
//! A simple kinematic vehicle used to close the guidance loop when running
//! without hardware. The vehicle turns towards the demanded heading at a
//! limited rate and instantly achieves the demanded speed.
//!
//! `SimVehicle` is a cheap handle to shared state, so a clone can be given to
//! the driver as the position source and another as the command sink.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Standard
use std::sync::{Arc, Mutex, MutexGuard};

// External
use log::warn;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use util::maths::{clamp, get_ang_dist_2pi, wrap_to_pi};
use crate::collab::{CommandSink, PositionSource};
use crate::los::GuidanceCmd;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the simulated vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimVehicleParams {
    /// Starting position of the vehicle.
    ///
    /// Units: meters
    pub initial_position_m: [f64; 2],

    /// Starting heading of the vehicle.
    ///
    /// Units: radians
    pub initial_heading_rad: f64,

    /// Maximum rate at which the vehicle can turn.
    ///
    /// Units: radians/second
    pub max_turn_rate_rads: f64,
}

/// Kinematic state of the simulated vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimVehicleState {
    pub position_m: Vector2<f64>,

    /// Heading in (-pi, pi]
    pub heading_rad: f64,

    pub speed_ms: f64,
}

#[derive(Debug)]
struct SimInner {
    state: SimVehicleState,
    demand: GuidanceCmd,
}

/// Handle to a simulated vehicle.
#[derive(Debug, Clone)]
pub struct SimVehicle {
    inner: Arc<Mutex<SimInner>>,
    max_turn_rate_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimVehicleParams {
    fn default() -> Self {
        Self {
            initial_position_m: [0.0, 0.0],
            initial_heading_rad: 0.0,
            max_turn_rate_rads: 0.5,
        }
    }
}

impl SimVehicle {
    pub fn new(params: &SimVehicleParams) -> Self {
        let state = SimVehicleState {
            position_m: Vector2::new(
                params.initial_position_m[0],
                params.initial_position_m[1]
            ),
            heading_rad: wrap_to_pi(params.initial_heading_rad),
            speed_ms: 0.0,
        };

        Self {
            inner: Arc::new(Mutex::new(SimInner {
                state,
                demand: GuidanceCmd::NONE,
            })),
            max_turn_rate_rads: params.max_turn_rate_rads.abs(),
        }
    }

    /// Propagate the vehicle forward by `dt_s` seconds using the last demand.
    pub fn step(&self, dt_s: f64) {
        let max_turn_rad = self.max_turn_rate_rads * dt_s;
        let mut inner = self.lock();
        let demand = inner.demand;
        let state = &mut inner.state;

        let heading_err_rad = get_ang_dist_2pi(state.heading_rad, demand.heading_rad);
        state.heading_rad = wrap_to_pi(
            state.heading_rad + clamp(heading_err_rad, -max_turn_rad, max_turn_rad)
        );
        state.speed_ms = demand.speed_ms;

        state.position_m += Vector2::new(
            state.heading_rad.cos(),
            state.heading_rad.sin()
        ) * state.speed_ms * dt_s;
    }

    pub fn state(&self) -> SimVehicleState {
        self.lock().state
    }

    fn lock(&self) -> MutexGuard<'_, SimInner> {
        match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                warn!("Simulated vehicle lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl PositionSource for SimVehicle {
    fn position(&mut self) -> Option<Vector2<f64>> {
        Some(self.lock().state.position_m)
    }
}

impl CommandSink for SimVehicle {
    fn send(&mut self, cmd: &GuidanceCmd) {
        self.lock().demand = *cmd;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn vehicle() -> SimVehicle {
        SimVehicle::new(&SimVehicleParams {
            initial_position_m: [1.0, 2.0],
            initial_heading_rad: 0.0,
            max_turn_rate_rads: 0.5,
        })
    }

    #[test]
    fn test_idle_vehicle_does_not_move() {
        let v = vehicle();
        v.step(1.0);

        assert_eq!(v.state().position_m, Vector2::new(1.0, 2.0));
        assert_eq!(v.state().speed_ms, 0.0);
    }

    #[test]
    fn test_straight_line() {
        let v = vehicle();
        let mut sink = v.clone();
        sink.send(&GuidanceCmd {
            speed_ms: 2.0,
            heading_rad: 0.0,
            switched: false,
        });

        v.step(0.5);

        let mut source = v.clone();
        assert_eq!(source.position(), Some(Vector2::new(2.0, 2.0)));
    }

    #[test]
    fn test_turn_rate_limit() {
        let v = vehicle();
        let mut sink = v.clone();
        sink.send(&GuidanceCmd {
            speed_ms: 0.0,
            heading_rad: 1.0,
            switched: false,
        });

        v.step(1.0);
        assert!((v.state().heading_rad - 0.5).abs() < 1e-12);

        v.step(1.0);
        assert!((v.state().heading_rad - 1.0).abs() < 1e-12);

        // Demand beyond pi is reached the short way round
        sink.send(&GuidanceCmd {
            speed_ms: 0.0,
            heading_rad: 1.0 + std::f64::consts::TAU,
            switched: false,
        });
        v.step(1.0);
        assert!((v.state().heading_rad - 1.0).abs() < 1e-9);
    }
}
