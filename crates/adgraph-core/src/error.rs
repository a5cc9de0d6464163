//! Centralized error types for graph exploration.

use thiserror::Error;

/// Error returned by preset execution.
///
/// Caller errors are detected before any store access. An empty result is
/// never an error.
#[derive(Error, Debug)]
pub enum ExploreError {
    #[error("Missing required parameter: preset")]
    MissingPreset,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Missing required parameter '{param}' for preset '{preset}'")]
    MissingParameter {
        preset: &'static str,
        param: &'static str,
    },

    #[error("Invalid value '{value}' for parameter '{param}': {reason}")]
    InvalidParameter {
        param: &'static str,
        value: String,
        reason: String,
    },

    #[error("Graph store error: {0}")]
    Store(String),
}

/// Result type for exploration operations.
pub type ExploreResult<T> = Result<T, ExploreError>;

impl ExploreError {
    /// Create a store error from any upstream error, keeping its context chain.
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(format!("{:#}", err))
    }

    /// True for errors caused by the request itself rather than the store.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
