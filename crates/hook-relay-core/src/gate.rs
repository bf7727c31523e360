//! Request gating: cheap precondition checks before any expensive work.
//!
//! The gate runs against the request *head* only: headers and the declared
//! content length. When it rejects, the body has not been read, so oversize
//! or unauthenticated senders cost the server almost nothing.

use crate::credentials::WebhookSecret;
use crate::error::HandleError;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Header carrying the HMAC-SHA256 signature, `sha256=<hex>` format.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Maximum accepted request body size in bytes.
///
/// Bodies up to and including this size are accepted; anything larger is
/// rejected before the body is read. This cap is the sole backpressure
/// mechanism.
pub const MAX_REQUEST_BODY_BYTES: u64 = 131072;

/// The pre-body view of an inbound request: headers plus the declared
/// content length.
///
/// Created once per request and discarded after handling. Header lookups
/// accept either lowercase or canonical-case names.
#[derive(Debug, Clone)]
pub struct RequestHead {
    headers: HashMap<String, String>,
    content_length: Option<u64>,
}

impl RequestHead {
    /// Build a request head from an HTTP header map.
    ///
    /// `content_length` is the *declared* length from the `Content-Length`
    /// header; `None` when the sender did not declare one (e.g. chunked
    /// transfer), in which case the gate's size check passes and the bounded
    /// body read enforces the cap instead.
    pub fn new(headers: HashMap<String, String>, content_length: Option<u64>) -> Self {
        Self {
            headers,
            content_length,
        }
    }

    /// Look up a header, trying the name as given and then lowercase.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| self.headers.get(&name.to_ascii_lowercase()))
            .map(|s| s.as_str())
    }

    /// The signature header value, if present and non-empty.
    pub fn signature(&self) -> Option<&str> {
        self.header(SIGNATURE_HEADER).filter(|s| !s.is_empty())
    }

    /// The declared content length, if the sender supplied one.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }
}

/// Enforces request preconditions in a fixed order.
#[derive(Debug, Clone)]
pub struct RequestGate {
    max_body_bytes: u64,
}

impl Default for RequestGate {
    fn default() -> Self {
        Self {
            max_body_bytes: MAX_REQUEST_BODY_BYTES,
        }
    }
}

impl RequestGate {
    /// A gate with a non-default body cap. Production wiring uses
    /// [`RequestGate::default`].
    pub fn with_max_body_bytes(max_body_bytes: u64) -> Self {
        Self { max_body_bytes }
    }

    /// Run the precondition checks; the first failing check wins.
    ///
    /// Order matters and is fixed:
    /// 1. secret configured, else the server is misconfigured (500),
    /// 2. signature header present and non-empty, else unauthorized (401),
    /// 3. declared content length within the cap, else bad request (400).
    ///
    /// No side effects beyond classification; the body is never consumed
    /// here.
    pub fn check(&self, head: &RequestHead, secret: Option<&WebhookSecret>) -> Result<(), HandleError> {
        match secret {
            Some(s) if !s.is_empty() => {}
            _ => {
                warn!("webhook secret not configured");
                return Err(HandleError::SecretNotConfigured);
            }
        }

        if head.signature().is_none() {
            debug!("request missing signature header");
            return Err(HandleError::MissingSignature);
        }

        if let Some(declared) = head.content_length() {
            if declared > self.max_body_bytes {
                debug!(declared, limit = self.max_body_bytes, "oversize request body");
                return Err(HandleError::BodyTooLarge {
                    declared,
                    limit: self.max_body_bytes,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
