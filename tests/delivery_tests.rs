mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::timeout;

use parley::delivery::{DeliveryQueue, Inbound, MessageDelivery, Outgoing, ScriptedReply, DEFAULT_REPLY_TEXT};
use parley::Side;

use common::{seeded_view, setup_logging};

/// Transport that never answers and counts what it was given.
struct FailingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl MessageDelivery for FailingTransport {
    async fn deliver(&self, outgoing: Outgoing) -> Result<Vec<Inbound>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("{} is unreachable", outgoing.partner_id))
    }
}

#[tokio::test]
async fn test_send_then_scripted_reply() {
    let mut view = seeded_view();
    let mut appended = view.subscribe();
    let transport = Arc::new(ScriptedReply::new(DEFAULT_REPLY_TEXT, Duration::from_millis(20)));
    let (mut queue, mut inbound_rx) = DeliveryQueue::new(transport);

    view.select("user2");
    view.set_draft_text("Is anyone there?", Instant::now());
    let outgoing = view.submit().expect("draft has text");
    queue.dispatch(outgoing);

    let reply = timeout(Duration::from_secs(2), inbound_rx.recv())
        .await
        .expect("reply within timeout")
        .expect("channel open");
    assert_eq!(reply.partner_id, "user2");
    assert_eq!(reply.body, "Thanks for the message! How can I assist you further?");

    view.receive(reply).unwrap();

    let sent = appended.try_recv().unwrap();
    let received = appended.try_recv().unwrap();
    assert!(received.id > sent.id);

    let tail: Vec<(Side, String)> = view
        .visible_messages()
        .iter()
        .rev()
        .take(2)
        .map(|m| (m.side, m.body.clone()))
        .collect();
    assert_eq!(
        tail,
        vec![
            (Side::Other, DEFAULT_REPLY_TEXT.to_string()),
            (Side::Own, "Is anyone there?".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_every_send_gets_its_own_reply() {
    setup_logging();
    let transport = Arc::new(ScriptedReply::new("ok", Duration::from_millis(10)));
    let (mut queue, mut inbound_rx) = DeliveryQueue::new(transport);

    for partner in ["user1", "user4"] {
        queue.dispatch(Outgoing {
            partner_id: partner.to_string(),
            body: "hi".to_string(),
            has_image: false,
        });
    }

    let mut partners = Vec::new();
    for _ in 0..2 {
        let reply = timeout(Duration::from_secs(2), inbound_rx.recv())
            .await
            .unwrap()
            .unwrap();
        partners.push(reply.partner_id);
    }
    partners.sort();
    assert_eq!(partners, vec!["user1", "user4"]);
}

#[tokio::test]
async fn test_failed_delivery_sends_nothing() {
    setup_logging();
    let transport = Arc::new(FailingTransport { calls: AtomicUsize::new(0) });
    let (mut queue, mut inbound_rx) = DeliveryQueue::new(transport.clone());

    queue.dispatch(Outgoing {
        partner_id: "user3".to_string(),
        body: "hello".to_string(),
        has_image: false,
    });

    let result = timeout(Duration::from_millis(200), inbound_rx.recv()).await;
    assert!(result.is_err(), "no reply expected from a failed delivery");
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_drop_aborts_pending_replies() {
    setup_logging();
    let transport = Arc::new(ScriptedReply::new("too late", Duration::from_secs(30)));
    let (mut queue, mut inbound_rx) = DeliveryQueue::new(transport);

    queue.dispatch(Outgoing {
        partner_id: "user2".to_string(),
        body: "bye".to_string(),
        has_image: false,
    });
    assert_eq!(queue.pending(), 1);

    drop(queue);

    // All senders go away once the aborted task is dropped
    let closed = timeout(Duration::from_secs(2), inbound_rx.recv())
        .await
        .expect("channel closes after abort");
    assert!(closed.is_none());
}

#[tokio::test]
async fn test_reply_waits_for_delay_and_arrives_once() {
    setup_logging();
    let transport = Arc::new(ScriptedReply::new(DEFAULT_REPLY_TEXT, Duration::from_millis(200)));
    let (mut queue, mut inbound_rx) = DeliveryQueue::new(transport);

    queue.dispatch(Outgoing {
        partner_id: "user1".to_string(),
        body: "anyone?".to_string(),
        has_image: false,
    });

    let early = timeout(Duration::from_millis(100), inbound_rx.recv()).await;
    assert!(early.is_err(), "reply must not arrive before its delay");

    let reply = timeout(Duration::from_secs(2), inbound_rx.recv())
        .await
        .expect("reply after the delay")
        .expect("channel open");
    assert_eq!(reply.partner_id, "user1");

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(matches!(inbound_rx.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(queue.pending(), 0);
}
