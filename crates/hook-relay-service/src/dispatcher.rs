//! The in-process event stream the service dispatches into.
//!
//! Validated webhook events fan out over a tokio broadcast channel to
//! whichever consumers are subscribed at the time. The dispatcher itself
//! does no queuing or retry; a consumer that lags far enough behind the
//! channel capacity loses the oldest events, which is the stream's contract.

use async_trait::async_trait;
use hook_relay_core::{DispatchError, EventDispatcher, WebhookEvent};
use tokio::sync::broadcast;
use tracing::debug;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// Broadcast-channel implementation of [`EventDispatcher`].
///
/// Posting succeeds whether or not anyone is subscribed: an event stream
/// with no listeners simply drops events, and an inbound webhook must not
/// fail because a consumer detached.
#[derive(Debug, Clone)]
pub struct StreamDispatcher {
    sender: broadcast::Sender<WebhookEvent>,
}

impl StreamDispatcher {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Attach a new consumer to the stream. The receiver sees only events
    /// posted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<WebhookEvent> {
        self.sender.subscribe()
    }

    /// Number of currently attached consumers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for StreamDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventDispatcher for StreamDispatcher {
    async fn post_event(&self, event: WebhookEvent) -> Result<(), DispatchError> {
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(receivers, "event posted to stream");
            }
            Err(_) => {
                // No subscribers attached; the event drops, by contract.
                debug!("event posted to stream with no subscribers");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
