//! Error types for the newsdesk

use thiserror::Error;

/// Newsdesk-wide error type
#[derive(Error, Debug)]
pub enum NewsdeskError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NewsdeskError {
    pub fn api(msg: impl Into<String>) -> Self {
        NewsdeskError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        NewsdeskError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        NewsdeskError::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        NewsdeskError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        NewsdeskError::Internal(msg.into())
    }
}

/// Result type alias for newsdesk operations
pub type NewsdeskResult<T> = Result<T, NewsdeskError>;
