//! Error taxonomy for webhook request handling.
//!
//! Every terminal pipeline state maps 1:1 onto an HTTP status:
//!
//! | Condition | Status |
//! |---|---|
//! | secret not configured | 500 |
//! | signature header missing | 401 |
//! | signature invalid or unsupported | 401 |
//! | declared body size over the cap | 400 |
//! | event-type header missing (post-auth) | 400 |
//! | body not a JSON object (post-auth) | 400 |
//! | HMAC primitive rejected the key | 500 |
//! | downstream dispatch failed | 500 |
//!
//! Client failures (4xx) are resolved locally and never retried; the 5xx
//! variants are hard errors for the hosting framework to surface.

use crate::event::DispatchError;
use thiserror::Error;

/// Failure of the HMAC primitive itself.
///
/// Distinct from "invalid signature": a signature that does not match is a
/// client authentication failure, while a primitive that cannot be keyed is
/// an environment failure that must not be reported as unauthorized.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The HMAC-SHA256 primitive rejected the webhook secret as a key.
    #[error("HMAC-SHA256 primitive rejected webhook key: {message}")]
    Hmac { message: String },
}

/// A webhook request that did not result in a dispatched event.
#[derive(Debug, Error)]
pub enum HandleError {
    /// The webhook secret is absent; the server cannot authenticate anything.
    #[error("webhook secret is not configured")]
    SecretNotConfigured,

    /// The signature header was missing or empty.
    #[error("missing webhook signature header")]
    MissingSignature,

    /// The signature did not verify against the current secret, used an
    /// unsupported scheme, or was not valid hex.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// The declared content length exceeds the request body cap.
    #[error("request body of {declared} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { declared: u64, limit: u64 },

    /// The event-type header was absent on an authenticated request.
    #[error("missing event type header")]
    MissingEventHeader,

    /// The body of an authenticated request was not a JSON object.
    #[error("request body is not a JSON object: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The HMAC primitive failed; an environment problem, not a client one.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The downstream dispatcher refused the event.
    #[error("event dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl HandleError {
    /// The HTTP status this failure maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SecretNotConfigured => 500,
            Self::MissingSignature => 401,
            Self::InvalidSignature => 401,
            Self::BodyTooLarge { .. } => 400,
            Self::MissingEventHeader => 400,
            Self::InvalidJson(_) => 400,
            Self::Signature(_) => 500,
            Self::Dispatch(_) => 500,
        }
    }

    /// Whether the failure is attributable to the caller (4xx class).
    ///
    /// Server-class failures must not echo internal detail back to the
    /// client.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
