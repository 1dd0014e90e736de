//! Error types for sole design tooling.

use sole_contact::SoleError;
use thiserror::Error;

/// Result type alias for design operations.
pub type DesignResult<T> = Result<T, DesignError>;

/// Errors that can occur during material lookup, metrics, or inverse design.
#[derive(Debug, Error)]
pub enum DesignError {
    /// The contact model rejected a design or load.
    #[error(transparent)]
    Solver(#[from] SoleError),

    /// Inverse-design configuration is out of range.
    #[error("invalid design configuration: {0}")]
    InvalidConfig(String),

    /// No material preset matches the requested name.
    #[error("unknown material: {0}")]
    UnknownMaterial(String),
}

impl DesignError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }
}
