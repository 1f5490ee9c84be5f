// Error types for hubseek.
// Classifies GitHub API failures into the kinds surfaced to callers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubseekError {
    #[error("network error (retrying may help): {0}")]
    Network(#[from] reqwest::Error),

    #[error("authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("no such user or resource: {0}")]
    NotFound(String),

    #[error("rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("request superseded by a newer one")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HubseekError>;
