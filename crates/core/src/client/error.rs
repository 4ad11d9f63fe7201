//! Remote client errors.

use thiserror::Error;

/// Errors from a journey-planner client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The GraphQL layer reported an error.
    #[error("service rejected the query: {0}")]
    Service(String),
    /// Payload did not match the expected shape.
    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
    /// Offline data unavailable or unreadable.
    #[error("offline data: {0}")]
    Offline(String),
}
