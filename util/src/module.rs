//! Cyclic module interface
//!
//! Algorithms run by `guide_exec` once per control cycle (such as the LOS
//! guidance) implement `State`, so the exec can initialise them from a
//! parameter file and step them the same way.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::session::Session;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A module stepped once per control cycle.
pub trait State {
    /// Passed to `init`, normally the parameter file path relative to the
    /// `params` directory
    type InitData;
    type InitError;

    /// Inputs sampled this cycle, e.g. the vehicle position
    type InputData;
    /// Demands produced this cycle, e.g. speed and heading
    type OutputData;
    /// Per-cycle diagnostics, usually archived
    type StatusReport;
    type ProcError;

    /// Load parameters and open any archives in the session.
    ///
    /// Calling `init` again replaces the module's configuration and
    /// discards its state.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Step the module for one cycle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Integrates its input, failing on non-finite values
    struct Integrator {
        gain: f64,
        total: f64,
    }

    impl State for Integrator {
        type InitData = f64;
        type InitError = ();
        type InputData = f64;
        type OutputData = f64;
        type StatusReport = usize;
        type ProcError = f64;

        fn init(&mut self, gain: f64, _session: &Session) -> Result<(), ()> {
            *self = Self { gain, total: 0.0 };
            Ok(())
        }

        fn proc(&mut self, input: &f64) -> Result<(f64, usize), f64> {
            if !input.is_finite() {
                return Err(*input);
            }

            self.total += self.gain * input;
            Ok((self.total, 1))
        }
    }

    /// Steps any module through a series of inputs, as the exec loop does.
    fn run<S: State>(module: &mut S, inputs: &[S::InputData]) -> Vec<S::OutputData> {
        inputs
            .iter()
            .filter_map(|i| module.proc(i).ok())
            .map(|(o, _)| o)
            .collect()
    }

    #[test]
    fn test_cyclic_processing() {
        let mut module = Integrator { gain: 2.0, total: 0.0 };

        assert_eq!(run(&mut module, &[1.0, f64::NAN, 0.5]), vec![2.0, 3.0]);
        assert_eq!(module.proc(&f64::INFINITY), Err(f64::INFINITY));
        assert_eq!(module.total, 3.0);
    }
}
