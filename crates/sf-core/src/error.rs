//! Error types for spreadfit.

use thiserror::Error;

/// Spreadfit error type.
///
/// Construction-time contract violations (malformed observed series,
/// inconsistent simulation windows) surface as [`Error::Validation`].
/// Per-evaluation domain problems never become errors: model evaluation
/// reports them as a `-inf` log-likelihood so a sampler can reject and move
/// on.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (trace persistence by downstream callers).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input contract violation, fatal at construction time.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error (e.g. a sampler that cannot find a starting point).
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
