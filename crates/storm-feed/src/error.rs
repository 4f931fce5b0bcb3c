//! Error types for the storm-feed crate.

use thiserror::Error;

/// Errors that can occur while fetching the alert feed.
///
/// None of these reach the dashboard: [`crate::AlertSource::fetch_alerts`]
/// logs them and reports an empty alert list instead.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport failure (DNS, connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-success status.
    #[error("unexpected status: {status}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
    },

    /// The body was not the expected JSON envelope.
    #[error("malformed response: {reason}")]
    Malformed {
        /// What was wrong with the body.
        reason: String,
    },

    /// Invalid client configuration.
    #[error("invalid feed config: {reason}")]
    InvalidConfig {
        /// The reason the configuration was rejected.
        reason: String,
    },
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            reason: err.to_string(),
        }
    }
}

/// Result type for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;
