//! Shared handle to the guidance
//!
//! Waypoints may be set from a different thread to the one running the
//! control cycle. All access goes through a mutex so that reconfiguration
//! and cyclic updates never interleave.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::sync::{Arc, Mutex, MutexGuard};
use log::warn;

// Internal
use super::{GuidanceCmd, GuidanceError, LosGuidance, StatusReport, Waypoint, WaypointView};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A cloneable, thread safe handle to a single `LosGuidance`.
#[derive(Clone, Debug)]
pub struct SharedGuidance {
    inner: Arc<Mutex<LosGuidance>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SharedGuidance {
    pub fn new(guidance: LosGuidance) -> Self {
        Self {
            inner: Arc::new(Mutex::new(guidance)),
        }
    }

    /// Set a new waypoint sequence, see `LosGuidance::set_waypoints`.
    pub fn set_waypoints(&self, points_m: Vec<Waypoint>) -> Result<(), GuidanceError> {
        self.lock().set_waypoints(points_m)
    }

    /// Run one guidance update, returning the command and the status report
    /// of the same cycle.
    pub fn update(&self, x: f64, y: f64) -> Result<(GuidanceCmd, StatusReport), GuidanceError> {
        let mut guidance = self.lock();
        let cmd = guidance.update(x, y)?;

        Ok((cmd, guidance.report()))
    }

    /// Run one guidance update and pass the resulting command and waypoints
    /// to `f` without releasing the lock, so the view always belongs to the
    /// sequence the command was computed from.
    ///
    /// `f` is not called if the update fails.
    pub fn update_with_view<F>(
        &self,
        x: f64,
        y: f64,
        f: F
    ) -> Result<(GuidanceCmd, StatusReport), GuidanceError>
    where
        F: FnOnce(&GuidanceCmd, WaypointView<'_>)
    {
        let mut guidance = self.lock();
        let cmd = guidance.update(x, y)?;

        if let Some(view) = guidance.view() {
            f(&cmd, view);
        }

        Ok((cmd, guidance.report()))
    }

    /// Run `f` with read access to the guidance.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&LosGuidance) -> R
    {
        let guidance = self.lock();
        f(&*guidance)
    }

    /// Run `f` with write access to the guidance.
    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut LosGuidance) -> R
    {
        let mut guidance = self.lock();
        f(&mut *guidance)
    }

    fn lock(&self) -> MutexGuard<'_, LosGuidance> {
        // The guidance is plain data and is left consistent between calls, so
        // a poisoned lock can be reused.
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("LOS guidance lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
