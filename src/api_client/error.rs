//! Legal API error types

use thiserror::Error;

/// API error with classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Timeout, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    /// Unexpected HTTP status. The response body is kept as the message since
    /// the backend reports validation failures there.
    pub fn status(code: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("HTTP {code}")
        } else {
            format!("HTTP {code}: {body}")
        };
        Self::new(ApiErrorKind::Status(code), message)
    }

    /// Classify a transport-level reqwest failure
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("Request timed out: {err}"))
        } else if err.is_decode() {
            Self::decode(format!("Malformed response: {err}"))
        } else {
            Self::network(format!("Connection error: {err}"))
        }
    }
}

/// Error classification for display and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Connection refused, DNS failure, reset
    Network,
    /// Request exceeded the configured timeout
    Timeout,
    /// Server answered with an unexpected status code
    Status(u16),
    /// Server answered but the body did not match the expected shape
    Decode,
}

impl ApiErrorKind {
    /// Whether the server was reached at all
    pub fn is_reachable(self) -> bool {
        matches!(self, Self::Status(_) | Self::Decode)
    }
}
