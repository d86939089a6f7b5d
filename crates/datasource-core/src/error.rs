//! Error types for data operations.
//!
//! This module defines [`DataError`] which covers all error cases that can occur
//! when configuring a provider, fetching a topic, or decoding its rows.

use thiserror::Error;

/// Errors that can occur during data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// Network-related errors (connection failures, unexpected HTTP status, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested topic is unknown to the provider.
    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    /// The topic string could not be mapped onto a provider request.
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No credential was found under the given environment variable.
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    /// Authentication failed for a provider.
    #[error("Authentication failed for provider {0}")]
    AuthenticationFailed(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
