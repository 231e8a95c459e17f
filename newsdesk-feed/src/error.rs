//! Error types for the feed module

use thiserror::Error;

/// Errors that can occur while fetching or parsing a search feed.
///
/// All of these are recovered at the aggregation layer: a failing query
/// contributes zero entries and the run continues.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed (network or timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Feed endpoint returned a non-2xx response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the endpoint
        message: String,
    },

    /// Failed to parse the feed document
    #[error("Parse error: {0}")]
    ParseError(String),
}
