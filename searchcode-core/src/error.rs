//! Error taxonomy for the transport boundary.
//!
//! Stale responses and invalid selections are not errors here: the sequencers
//! discard stale completions and the result store turns bad selections into
//! no-ops. Only real transport failures surface as values of this type.

use thiserror::Error;

/// A failed service call.
///
/// Cloneable so the same failure can be logged, returned to the caller and kept
/// for the status bar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection refused, DNS failure, reset, or any other I/O-level error.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-success HTTP status.
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The payload could not be decoded into the expected shape.
    #[error("invalid response payload: {0}")]
    Decode(String),

    /// The envelope carried an `error` message from the service.
    #[error("service error: {0}")]
    Service(String),
}

impl TransportError {
    /// Classifies a reqwest failure, keeping timeouts distinguishable.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Convenience alias for results crossing the transport boundary.
pub type TransportResult<T> = Result<T, TransportError>;
