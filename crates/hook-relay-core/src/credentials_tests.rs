//! Tests for secret storage and rotation.

use super::*;

// ============================================================================
// Snapshot semantics
// ============================================================================

mod snapshot_tests {
    use super::*;

    /// A configured secret is returned as a snapshot.
    #[tokio::test]
    async fn test_configured_secret_snapshotted() {
        let creds = RotatingCredentials::new(Some("topsecret".to_string()));

        let snapshot = creds.webhook_secret().await;

        assert_eq!(snapshot, Some(WebhookSecret::new("topsecret")));
    }

    /// No initial secret means unconfigured.
    #[tokio::test]
    async fn test_absent_secret_is_unconfigured() {
        let creds = RotatingCredentials::new(None);
        assert!(creds.webhook_secret().await.is_none());
    }

    /// An empty initial secret is normalized to unconfigured.
    #[tokio::test]
    async fn test_empty_secret_is_unconfigured() {
        let creds = RotatingCredentials::new(Some(String::new()));
        assert!(creds.webhook_secret().await.is_none());
    }
}

// ============================================================================
// Rotation
// ============================================================================

mod rotation_tests {
    use super::*;

    /// After rotation, readers observe the new secret.
    #[tokio::test]
    async fn test_rotate_replaces_secret() {
        let creds = RotatingCredentials::new(Some("old".to_string()));

        creds.rotate(Some("new".to_string())).await;

        assert_eq!(creds.webhook_secret().await, Some(WebhookSecret::new("new")));
    }

    /// Rotating to `None` clears the secret.
    #[tokio::test]
    async fn test_rotate_to_none_clears_secret() {
        let creds = RotatingCredentials::new(Some("old".to_string()));

        creds.rotate(None).await;

        assert!(creds.webhook_secret().await.is_none());
    }

    /// A snapshot taken before rotation is unaffected by it.
    #[tokio::test]
    async fn test_snapshot_survives_rotation() {
        let creds = RotatingCredentials::new(Some("old".to_string()));
        let snapshot = creds.webhook_secret().await.unwrap();

        creds.rotate(Some("new".to_string())).await;

        assert_eq!(snapshot, WebhookSecret::new("old"));
    }

    /// Concurrent readers never observe a torn value: every snapshot is
    /// either the old or the new secret in full.
    #[tokio::test]
    async fn test_concurrent_reads_see_whole_generations() {
        use std::sync::Arc;

        let creds = Arc::new(RotatingCredentials::new(Some("generation-one".to_string())));

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let creds = creds.clone();
                tokio::spawn(async move {
                    for _ in 0..100 {
                        let snapshot = creds.webhook_secret().await;
                        match snapshot {
                            Some(s) => assert!(
                                s == WebhookSecret::new("generation-one")
                                    || s == WebhookSecret::new("generation-two")
                            ),
                            None => panic!("secret vanished during rotation"),
                        }
                    }
                })
            })
            .collect();

        creds.rotate(Some("generation-two".to_string())).await;

        for reader in readers {
            reader.await.unwrap();
        }
    }
}

// ============================================================================
// Redaction
// ============================================================================

mod redaction_tests {
    use super::*;

    /// `Debug` output must never reveal the secret value.
    #[test]
    fn test_debug_redacts_secret_value() {
        let secret = WebhookSecret::new("top-secret-value");
        let debug_str = format!("{:?}", secret);

        assert!(!debug_str.contains("top-secret-value"));
        assert!(debug_str.contains("<REDACTED>"));
    }

    /// Same for the store.
    #[test]
    fn test_store_debug_redacts_secret() {
        let creds = RotatingCredentials::new(Some("top-secret-value".to_string()));
        let debug_str = format!("{:?}", creds);

        assert!(!debug_str.contains("top-secret-value"));
        assert!(debug_str.contains("<REDACTED>"));
    }
}
