//! Error types for the resource-protection layer
//!
//! Provides the closed failure taxonomy using thiserror. `ClassifiedError`
//! is the only structured failure value exposed to callers; cache misses and
//! quota denials are ordinary return values, never errors.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

// == Error Kind Enum ==
/// Closed taxonomy of remote-call failures.
///
/// Produced by the classifier, consumed by the retry executor to decide
/// whether another attempt can help, and surfaced to the calling layer for
/// user-facing messaging.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Host connectivity is down; no request can reach the remote service
    #[error("network unavailable")]
    NetworkUnavailable,

    /// The remote service rejected the call with HTTP 429
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// The remote service rejected the credentials (HTTP 401)
    #[error("unauthorized")]
    Unauthorized,

    /// The remote service failed internally (HTTP 5xx)
    #[error("server fault")]
    ServerFault,

    /// Anything that does not match a more specific kind
    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    // == Is Retryable ==
    /// Whether another attempt within the same call can succeed.
    ///
    /// Unauthorized and RateLimitExceeded cannot be resolved by retrying:
    /// credentials do not fix themselves and quota windows outlast any
    /// reasonable backoff.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorKind::Unauthorized | ErrorKind::RateLimitExceeded)
    }
}

// == Classified Error ==
/// Immutable classification of a single failure.
///
/// Built once by the classifier and never mutated after construction.
#[derive(Error, Debug, Clone, Serialize)]
#[error("{kind}: {message}")]
pub struct ClassifiedError {
    /// Which bucket of the taxonomy the failure landed in
    pub kind: ErrorKind,
    /// Human-readable description, suitable for UI messaging
    pub message: String,
    /// Opaque details carried over from the raw failure, if any
    pub raw_details: Option<serde_json::Value>,
    /// When the classification was made
    pub timestamp: DateTime<Utc>,
}

impl ClassifiedError {
    /// Creates a classified error stamped with the current time.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raw_details: None,
            timestamp: Utc::now(),
        }
    }

    /// Attaches the raw failure details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.raw_details = Some(details);
        self
    }
}

// == Raw Failure ==
/// The arbitrary failure value a remote operation surfaces.
///
/// Remote calls report whatever they know: an HTTP-like status, a message,
/// opaque payload details. The classifier turns this into a
/// [`ClassifiedError`]; no field is required.
#[derive(Debug, Clone, Default)]
pub struct RawFailure {
    /// HTTP-like status code, if the failure carried one
    pub status: Option<u16>,
    /// Failure message, if one was extractable
    pub message: Option<String>,
    /// Opaque payload for diagnostics
    pub details: Option<serde_json::Value>,
}

impl RawFailure {
    /// Creates a failure carrying only a status code.
    pub fn from_status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Creates a failure carrying only a message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Sets the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the opaque details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

// == Result Type Alias ==
/// Convenience Result type for guarded operations.
pub type Result<T> = std::result::Result<T, ClassifiedError>;
