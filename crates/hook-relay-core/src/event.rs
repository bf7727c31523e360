//! Validated webhook events and the dispatcher seam.
//!
//! A [`WebhookEvent`] is only ever constructed after the signature check has
//! succeeded against the currently configured secret; the pipeline enforces
//! this, and nothing else in the crate creates events.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// A validated, decoded webhook callback.
///
/// Ownership transfers to the [`EventDispatcher`] on dispatch; the pipeline
/// holds no reference afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookEvent {
    /// Event-type name from the sender's event header (e.g. `push`).
    pub event_type: String,

    /// The parsed JSON payload. Treated as an opaque document; interpreting
    /// it is the consumers' business.
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl WebhookEvent {
    pub fn new(
        event_type: impl Into<String>,
        payload: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }
}

/// Downstream refusal to accept a validated event.
///
/// Both variants surface as internal errors (500): the request itself was
/// legitimately authenticated, so the failure is never the caller's fault.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The dispatcher's permission backend rejected the post.
    #[error("dispatcher denied event: {message}")]
    PermissionDenied { message: String },

    /// The event stream is gone (e.g. the host is shutting down).
    #[error("event stream closed: {message}")]
    StreamClosed { message: String },
}

/// Accepts validated events into the host's internal event stream.
///
/// Dispatch is synchronous from the pipeline's point of view: a failure
/// aborts the request with an error response, and the core performs no
/// retry or queuing. Which dispatcher is active is decided by the wiring at
/// process startup, not by the core.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    /// Post a validated event. Ownership of the event transfers to the
    /// dispatcher.
    async fn post_event(&self, event: WebhookEvent) -> Result<(), DispatchError>;
}
