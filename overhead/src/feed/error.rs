//! Error types for flight feeds.

use thiserror::Error;

/// Errors fetching or decoding a feed response.
///
/// Both are transient: the poll loop logs them and tries again next cycle.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON deserialization failed.
    #[error("Failed to parse response: {0}")]
    Json(String),
}
