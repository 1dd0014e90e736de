//! Error types for sole contact simulation.

use thiserror::Error;

/// Result type alias for sole contact operations.
pub type SoleResult<T> = Result<T, SoleError>;

/// Errors that can occur while configuring or running a sole simulation.
///
/// Solver non-convergence and a degenerate dynamic rescale are reported
/// through the returned solutions, never through this type.
#[derive(Debug, Error)]
pub enum SoleError {
    /// Grid dimensions or resolution are unusable.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Design, gait, or solver parameters are out of range.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl SoleError {
    /// Create an invalid grid error.
    #[must_use]
    pub fn invalid_grid(details: impl Into<String>) -> Self {
        Self::InvalidGrid(details.into())
    }

    /// Create an invalid parameters error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}
