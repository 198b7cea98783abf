//! Delivery across simulated processes sharing an in-memory hub.
//!
//! Each `AppContext` plays one server process; the hub plays the broker.

use futures_util::StreamExt;
use ordercast_commons::{codec, OrderLine, OrderNotification, OrderStatus, RecipientId};
use ordercast_configs::ServerConfig;
use ordercast_core::bus::{ChannelBus, MemoryHub};
use ordercast_core::live::SessionState;
use ordercast_core::AppContext;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

fn process(hub: &Arc<MemoryHub>) -> Arc<AppContext> {
    AppContext::with_bus(ServerConfig::default(), |listener| {
        hub.connect(listener) as Arc<dyn ChannelBus>
    })
}

/// Payload carried by an `ordered` frame.
fn ordered_payload(frame: &[u8]) -> OrderNotification {
    let text = std::str::from_utf8(frame).unwrap();
    let data = text
        .strip_prefix("event: ordered\ndata: ")
        .and_then(|rest| rest.strip_suffix("\n\n"))
        .unwrap_or_else(|| panic!("not an ordered frame: {:?}", text));
    codec::decode(data.as_bytes()).unwrap()
}

fn order(id: i64) -> OrderNotification {
    OrderNotification::new(id, OrderStatus::Ordered)
        .with_member_email("a@x.com")
        .with_item(OrderLine {
            detail_id: 1,
            product_name: "desk lamp".to_string(),
            quantity: 1,
        })
}

#[tokio::test]
async fn test_publish_on_one_process_reaches_session_on_other() {
    let hub = MemoryHub::new();
    let p1 = process(&hub);
    let p2 = process(&hub);
    let recipient = RecipientId::new("a@x.com");

    let mut stream = p1.sessions().open_session(recipient.clone()).unwrap();
    let handshake = stream.next().await.unwrap().unwrap();
    assert_eq!(&handshake[..], b"event: connect\ndata: connected!\n\n");

    p2.dispatcher().notify(&recipient, &order(42)).unwrap();

    let frame = stream.next().await.unwrap().unwrap();
    let text = std::str::from_utf8(&frame).unwrap();
    assert!(text.starts_with("event: ordered\ndata: "));
    assert!(text.contains("\"orderId\":42"));
    assert!(text.contains("\"productName\":\"desk lamp\""));

    // Exactly one event: nothing else is queued behind it
    let next = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
    assert!(next.is_err());

    // p2 has no session for the recipient and is not subscribed to its topic
    assert!(p2.registry().lookup(&recipient).is_none());
    assert_eq!(p2.bus().subscription_count("a@x.com"), 0);
}

#[tokio::test]
async fn test_publish_from_session_holder_is_delivered_once() {
    let hub = MemoryHub::new();
    let p1 = process(&hub);
    let _p2 = process(&hub);
    let recipient = RecipientId::new("a@x.com");

    let mut stream = p1.sessions().open_session(recipient.clone()).unwrap();
    let _handshake = stream.next().await;

    p1.dispatcher().notify(&recipient, &order(1)).unwrap();

    assert!(stream.next().await.is_some());
    let next = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
    assert!(next.is_err());
}

#[tokio::test]
async fn test_notify_without_any_session_is_noop() {
    let hub = MemoryHub::new();
    let p1 = process(&hub);
    let p2 = process(&hub);

    p1.dispatcher()
        .notify(&RecipientId::new("nobody@x.com"), &order(5))
        .unwrap();

    assert!(p1.registry().is_empty());
    assert!(p2.registry().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_opens_subscribe_once() {
    const OPENERS: usize = 16;

    for _ in 0..20 {
        let hub = MemoryHub::new();
        let p1 = process(&hub);
        let recipient = RecipientId::new("a@x.com");
        let barrier = Arc::new(Barrier::new(OPENERS));

        let handles: Vec<_> = (0..OPENERS)
            .map(|_| {
                let p1 = Arc::clone(&p1);
                let recipient = recipient.clone();
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    p1.sessions().open_session(recipient)
                })
            })
            .collect();

        let mut streams = Vec::with_capacity(OPENERS);
        for handle in handles {
            streams.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(p1.bus().subscription_count("a@x.com"), 1);
        assert_eq!(p1.subscriptions().len(), 1);
        assert_eq!(p1.registry().len(), 1);
        assert_eq!(p1.sessions().open_streams(), OPENERS);
    }
}

#[tokio::test]
async fn test_events_for_one_recipient_arrive_in_publish_order() {
    const ORDERS: i64 = 100;

    let hub = MemoryHub::new();
    let p1 = process(&hub);
    let p2 = process(&hub);
    let recipient = RecipientId::new("a@x.com");

    let mut stream = p1.sessions().open_session(recipient.clone()).unwrap();
    let _handshake = stream.next().await;

    for id in 0..ORDERS {
        p2.dispatcher()
            .notify(&recipient, &OrderNotification::new(id, OrderStatus::Ordered))
            .unwrap();
        // Drain as we go so the session buffer never fills
        let frame = stream.next().await.unwrap().unwrap();
        assert_eq!(ordered_payload(&frame).order_id, id);
    }
}

#[tokio::test]
async fn test_placed_order_reaches_open_stream_then_stops_after_close() {
    let hub = MemoryHub::new();
    let p1 = process(&hub);
    let p2 = process(&hub);
    let recipient = RecipientId::new("a@x.com");

    let mut stream = p1.sessions().open_session(recipient.clone()).unwrap();
    let handshake = stream.next().await.unwrap().unwrap();
    assert_eq!(&handshake[..], b"event: connect\ndata: connected!\n\n");

    let sent = OrderNotification::new(42, OrderStatus::Placed);
    p2.dispatcher().notify(&recipient, &sent).unwrap();

    let frame = stream.next().await.unwrap().unwrap();
    assert_eq!(ordered_payload(&frame), sent);

    let session = Arc::clone(stream.session());
    assert!(session.close(SessionState::Completed));
    assert!(p1.registry().lookup(&recipient).is_none());

    assert!(p2.dispatcher().notify(&recipient, &sent).is_ok());
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_disconnected_client_is_cleaned_up_on_delivery() {
    let hub = MemoryHub::new();
    let p1 = process(&hub);
    let p2 = process(&hub);
    let recipient = RecipientId::new("a@x.com");

    let stream = p1.sessions().open_session(recipient.clone()).unwrap();
    let session = Arc::clone(stream.session());
    drop(stream);

    assert_eq!(session.state(), SessionState::Completed);
    assert!(p1.registry().lookup(&recipient).is_none());

    // Subscription outlives the session; delivery finds nobody and is a no-op
    assert!(p1.subscriptions().is_subscribed(&recipient));
    p2.dispatcher().notify(&recipient, &order(9)).unwrap();
    assert!(p1.registry().is_empty());
}
