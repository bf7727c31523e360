//! Tests for the broadcast event stream dispatcher.

use super::*;
use hook_relay_core::WebhookEvent;

fn event(event_type: &str) -> WebhookEvent {
    let mut payload = serde_json::Map::new();
    payload.insert("a".to_string(), serde_json::json!(1));
    WebhookEvent::new(event_type, payload)
}

/// A subscriber receives exactly the posted event.
#[tokio::test]
async fn test_subscriber_receives_posted_event() {
    let dispatcher = StreamDispatcher::new();
    let mut subscriber = dispatcher.subscribe();

    dispatcher.post_event(event("push")).await.unwrap();

    let received = subscriber.recv().await.unwrap();
    assert_eq!(received.event_type, "push");
    assert_eq!(received.payload.get("a"), Some(&serde_json::json!(1)));
}

/// Posting with no subscribers attached succeeds; the event drops.
#[tokio::test]
async fn test_post_without_subscribers_succeeds() {
    let dispatcher = StreamDispatcher::new();
    assert_eq!(dispatcher.subscriber_count(), 0);

    let result = dispatcher.post_event(event("push")).await;

    assert!(result.is_ok(), "stream without listeners must accept events");
}

/// Every attached subscriber sees every event.
#[tokio::test]
async fn test_fan_out_to_multiple_subscribers() {
    let dispatcher = StreamDispatcher::new();
    let mut first = dispatcher.subscribe();
    let mut second = dispatcher.subscribe();
    assert_eq!(dispatcher.subscriber_count(), 2);

    dispatcher.post_event(event("push")).await.unwrap();
    dispatcher.post_event(event("pull_request")).await.unwrap();

    assert_eq!(first.recv().await.unwrap().event_type, "push");
    assert_eq!(first.recv().await.unwrap().event_type, "pull_request");
    assert_eq!(second.recv().await.unwrap().event_type, "push");
    assert_eq!(second.recv().await.unwrap().event_type, "pull_request");
}

/// A late subscriber only sees events posted after it attached.
#[tokio::test]
async fn test_late_subscriber_misses_earlier_events() {
    let dispatcher = StreamDispatcher::new();
    let mut early = dispatcher.subscribe();

    dispatcher.post_event(event("push")).await.unwrap();

    let mut late = dispatcher.subscribe();
    dispatcher.post_event(event("release")).await.unwrap();

    assert_eq!(early.recv().await.unwrap().event_type, "push");
    assert_eq!(early.recv().await.unwrap().event_type, "release");
    assert_eq!(late.recv().await.unwrap().event_type, "release");
    assert!(late.try_recv().is_err(), "late subscriber must not replay history");
}
