//! Step observer trait for monitoring simulation progress.

use crate::integrator::StepStats;

/// Trait for observing simulation steps.
///
/// Implement this trait to monitor the integrator (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver {
    /// Called after each force evaluation. Euler evaluates once per step
    /// (stage 0); RK4 evaluates four times (stages 0 to 3).
    fn on_forces_evaluated(&mut self, _stage: usize) {}

    /// Called after positions and velocities have been advanced.
    fn on_integrate(&mut self) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self, _stats: &StepStats) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
