//! Errors raised while constructing catalog values.

use thiserror::Error;

/// A value was rejected before it reached storage.
///
/// Storage failures (constraint violations, lost connections) are reported
/// by the store layer instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    /// An id string did not parse as an integer.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
