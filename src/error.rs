//! Error types for simulation setup and health checks.

use thiserror::Error;

/// Errors that can occur while configuring or running a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JelloError {
    /// A configuration value is out of range (resolution, mass, timestep, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Point index is out of bounds.
    #[error("point index {index} out of bounds (count: {count})")]
    PointOutOfBounds { index: usize, count: usize },

    /// The simulation produced non-finite state and should be reset.
    #[error(
        "numerical degeneracy: {non_finite_points} non-finite point updates, \
         {degenerate_springs} degenerate springs over {steps} steps"
    )]
    NumericalDegeneracy {
        steps: u64,
        degenerate_springs: u64,
        non_finite_points: u64,
    },
}

impl JelloError {
    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Result type for jello operations.
pub type Result<T> = core::result::Result<T, JelloError>;
