//! Error types for calls to the reminder server.
//!
//! Every variant is recoverable: the poller logs it and waits for the next tick,
//! the dose logger turns it into an error toast.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout and friends
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server returned HTTP {0}")]
    Status(StatusCode),

    /// The body did not match the expected JSON shape
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_timeout())
    }
}
