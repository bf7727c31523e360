//! Webhook secret storage and rotation.
//!
//! The shared secret is the one piece of state that outlives a request. It is
//! owned by configuration, read-only to the pipeline, and may be rotated at
//! runtime by an external reload path. Readers always observe either the old
//! or the new secret atomically, never a torn value.

use async_trait::async_trait;
use tokio::sync::RwLock;

/// The shared webhook secret used as the HMAC key.
///
/// The raw value is only reachable through [`WebhookSecret::as_bytes`] at
/// the point where the HMAC is keyed, and the `Debug` implementation never
/// reveals it.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Wrap a raw secret value.
    ///
    /// An empty string is not a usable secret; callers that read secrets from
    /// configuration should treat empty as unconfigured (see
    /// [`RotatingCredentials::new`]).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw key bytes for the HMAC primitive.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether the secret is empty (unusable).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Never expose the secret in debug output or logs.
impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WebhookSecret").field(&"<REDACTED>").finish()
    }
}

/// Supplies the current shared webhook secret.
///
/// `None` means the secret is unconfigured, which the gate surfaces to
/// callers as a server misconfiguration rather than an authentication
/// failure.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Snapshot the currently configured secret.
    ///
    /// The returned value is a point-in-time copy; a concurrent rotation does
    /// not affect requests that already hold a snapshot.
    async fn webhook_secret(&self) -> Option<WebhookSecret>;
}

/// A [`SecretStore`] that supports out-of-band secret rotation.
///
/// Request handlers take read snapshots; a configuration-reload path calls
/// [`rotate`](Self::rotate) with the new value. The `RwLock` guarantees that
/// a reader sees exactly one generation of the secret.
pub struct RotatingCredentials {
    secret: RwLock<Option<WebhookSecret>>,
}

impl RotatingCredentials {
    /// Create a credentials store with an optional initial secret.
    ///
    /// An absent or empty initial value leaves the store unconfigured; every
    /// request will then be rejected as a server misconfiguration until a
    /// rotation installs a real secret.
    pub fn new(initial: Option<String>) -> Self {
        Self {
            secret: RwLock::new(Self::normalize(initial)),
        }
    }

    /// Replace the current secret.
    ///
    /// `None` (or an empty string) clears the secret, returning the store to
    /// the unconfigured state. In-flight requests keep the snapshot they
    /// already took.
    pub async fn rotate(&self, secret: Option<String>) {
        let mut guard = self.secret.write().await;
        *guard = Self::normalize(secret);
    }

    fn normalize(secret: Option<String>) -> Option<WebhookSecret> {
        secret.filter(|s| !s.is_empty()).map(WebhookSecret::new)
    }
}

impl std::fmt::Debug for RotatingCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingCredentials")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

#[async_trait]
impl SecretStore for RotatingCredentials {
    async fn webhook_secret(&self) -> Option<WebhookSecret> {
        self.secret.read().await.clone()
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
