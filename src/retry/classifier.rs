//! Error Classifier Module
//!
//! Maps arbitrary remote-call failures into the closed error taxonomy.
//! Classification is a total function: whatever the failure carries (or
//! doesn't), a `ClassifiedError` comes out.

use std::sync::Arc;

use crate::error::{ClassifiedError, ErrorKind, RawFailure};

// == Connectivity Probe ==
/// Host-reported network connectivity.
///
/// The classifier checks connectivity before looking at status codes: a
/// request that never left the machine says nothing about the remote
/// service. Hosts inject their own probe; tests inject stubs.
pub trait ConnectivityProbe: Send + Sync {
    /// Whether the host currently has network connectivity.
    fn is_online(&self) -> bool;
}

/// Probe for hosts without a connectivity signal; reports online always.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

// == Error Classifier ==
/// Turns raw failures into classified errors.
#[derive(Clone)]
pub struct ErrorClassifier {
    /// Connectivity source consulted first in the precedence order
    probe: Arc<dyn ConnectivityProbe>,
}

impl ErrorClassifier {
    // == Constructor ==
    /// Creates a classifier that assumes the host is always online.
    pub fn new() -> Self {
        Self::with_probe(Arc::new(AlwaysOnline))
    }

    /// Creates a classifier consulting the given connectivity probe.
    pub fn with_probe(probe: Arc<dyn ConnectivityProbe>) -> Self {
        Self { probe }
    }

    // == Classify ==
    /// Classifies a raw failure, in precedence order:
    /// 1. Host offline → NetworkUnavailable
    /// 2. Status 429 → RateLimitExceeded
    /// 3. Status 401 → Unauthorized
    /// 4. Status ≥ 500 → ServerFault
    /// 5. Otherwise → Unknown
    ///
    /// The raw message is kept when present; each kind has a fallback
    /// suitable for UI display. Opaque details are carried through.
    pub fn classify(&self, failure: &RawFailure) -> ClassifiedError {
        let kind = if !self.probe.is_online() {
            ErrorKind::NetworkUnavailable
        } else {
            match failure.status {
                Some(429) => ErrorKind::RateLimitExceeded,
                Some(401) => ErrorKind::Unauthorized,
                Some(status) if status >= 500 => ErrorKind::ServerFault,
                _ => ErrorKind::Unknown,
            }
        };

        let message = failure
            .message
            .clone()
            .unwrap_or_else(|| default_message(kind).to_string());

        let mut classified = ClassifiedError::new(kind, message);
        if let Some(details) = &failure.details {
            classified = classified.with_details(details.clone());
        }
        classified
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// == Default Messages ==
/// Fallback message when the raw failure carried none.
fn default_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NetworkUnavailable => "No network connection is available",
        ErrorKind::RateLimitExceeded => "The service rejected the request due to rate limiting",
        ErrorKind::Unauthorized => "The service rejected the provided credentials",
        ErrorKind::ServerFault => "The service failed to process the request",
        ErrorKind::Unknown => "The operation failed for an unknown reason",
    }
}
