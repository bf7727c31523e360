//! Pipeline orchestration: gate → verify → decode → dispatch.
//!
//! Each inbound request is handled exactly once, synchronously, start to
//! finish, by whichever worker the host assigned it. The pipeline holds no
//! per-request mutable state; the only shared state is the [`SecretStore`],
//! which is snapshotted once per request so the gate and the signature check
//! always see the same secret generation.

use crate::credentials::{SecretStore, WebhookSecret};
use crate::error::HandleError;
use crate::event::{EventDispatcher, WebhookEvent};
use crate::gate::{RequestGate, RequestHead};
use crate::{payload, signature};
use std::sync::Arc;
use tracing::{debug, warn};

/// Header naming the event type. Read only after the signature check has
/// succeeded, so unauthenticated callers learn nothing about event handling.
pub const EVENT_TYPE_HEADER: &str = "x-github-event";

/// The webhook authentication-and-validation pipeline.
///
/// Composed once at process startup from its two collaborators and shared
/// across request workers.
pub struct WebhookPipeline {
    secrets: Arc<dyn SecretStore>,
    dispatcher: Arc<dyn EventDispatcher>,
    gate: RequestGate,
}

impl WebhookPipeline {
    pub fn new(secrets: Arc<dyn SecretStore>, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self {
            secrets,
            dispatcher,
            gate: RequestGate::default(),
        }
    }

    /// Run the pre-body phase: snapshot the secret and apply the gate.
    ///
    /// On success the caller may read the body and hand it to
    /// [`process`](Self::process) together with the returned snapshot, which
    /// guarantees the signature is verified against the same secret the gate
    /// saw. On failure the body must not be read.
    pub async fn gate(&self, head: &RequestHead) -> Result<WebhookSecret, HandleError> {
        let secret = self.secrets.webhook_secret().await;
        self.gate.check(head, secret.as_ref())?;
        // check() already rejected an absent secret.
        secret.ok_or(HandleError::SecretNotConfigured)
    }

    /// Run the post-body phase: verify, decode, and dispatch.
    ///
    /// Stage order is fixed: signature verification, then the event-type
    /// header check, then JSON decoding. The header check runs before the
    /// parse so that a missing header on an authenticated request is
    /// reported without touching the body.
    pub async fn process(
        &self,
        head: &RequestHead,
        body: &[u8],
        secret: &WebhookSecret,
    ) -> Result<String, HandleError> {
        // The gate already required the header; absent here only if callers
        // skipped the gate.
        let sig_header = head.signature().ok_or(HandleError::MissingSignature)?;

        if !signature::verify(sig_header, body, secret)? {
            debug!("invalid webhook signature");
            return Err(HandleError::InvalidSignature);
        }

        let event_type = match head.header(EVENT_TYPE_HEADER) {
            Some(name) => name.to_string(),
            None => {
                // Authenticated sender with no event header; worth more than
                // a debug line.
                warn!("authenticated webhook missing event type header");
                return Err(HandleError::MissingEventHeader);
            }
        };

        let document = payload::decode(body).map_err(|e| {
            warn!(error = %e, "authenticated webhook carried invalid JSON");
            HandleError::from(e)
        })?;

        debug!(event_type = %event_type, "received webhook");

        let event = WebhookEvent::new(event_type.clone(), document);
        self.dispatcher.post_event(event).await?;

        Ok(event_type)
    }

    /// Full pipeline for callers that already hold the body bytes.
    ///
    /// HTTP hosts should prefer the two-phase [`gate`](Self::gate) /
    /// [`process`](Self::process) split so a gated request never reads its
    /// body.
    pub async fn handle(&self, head: &RequestHead, body: &[u8]) -> Result<String, HandleError> {
        let secret = self.gate(head).await?;
        self.process(head, body, &secret).await
    }
}

impl std::fmt::Debug for WebhookPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookPipeline")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
