// Message delivery channel
//
// Outgoing messages are handed to a `MessageDelivery` implementation on a
// background task; whatever it answers comes back over an mpsc channel that the
// UI loop drains. `ScriptedReply` stands in for a real transport.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_REPLY_TEXT: &str = "Thanks for the message! How can I assist you further?";
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_secs(1);

const INBOUND_CAPACITY: usize = 100;

/// A message the local user just sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub partner_id: String,
    pub body: String,
    pub has_image: bool,
}

/// A message arriving from a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub partner_id: String,
    pub body: String,
}

#[async_trait]
pub trait MessageDelivery: Send + Sync {
    /// Deliver one message and return whatever the other side answers.
    async fn deliver(&self, outgoing: Outgoing) -> Result<Vec<Inbound>>;
}

/// Answers every message with the same text after a fixed delay.
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    text: String,
    delay: Duration,
}

impl ScriptedReply {
    pub fn new(text: &str, delay: Duration) -> Self {
        ScriptedReply {
            text: text.to_string(),
            delay,
        }
    }
}

impl Default for ScriptedReply {
    fn default() -> Self {
        ScriptedReply::new(DEFAULT_REPLY_TEXT, DEFAULT_REPLY_DELAY)
    }
}

#[async_trait]
impl MessageDelivery for ScriptedReply {
    async fn deliver(&self, outgoing: Outgoing) -> Result<Vec<Inbound>> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![Inbound {
            partner_id: outgoing.partner_id,
            body: self.text.clone(),
        }])
    }
}

/// Runs deliveries in the background and funnels replies into one channel.
///
/// Dropping the queue aborts every delivery still in flight.
pub struct DeliveryQueue {
    transport: Arc<dyn MessageDelivery>,
    inbound_tx: mpsc::Sender<Inbound>,
    tasks: Vec<JoinHandle<()>>,
}

impl DeliveryQueue {
    pub fn new(transport: Arc<dyn MessageDelivery>) -> (Self, mpsc::Receiver<Inbound>) {
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
        let queue = DeliveryQueue {
            transport,
            inbound_tx,
            tasks: Vec::new(),
        };
        (queue, inbound_rx)
    }

    /// Hand a message to the transport. Must be called inside a tokio runtime.
    pub fn dispatch(&mut self, outgoing: Outgoing) {
        self.tasks.retain(|task| !task.is_finished());

        let transport = self.transport.clone();
        let inbound_tx = self.inbound_tx.clone();
        info!("Dispatching message for {}", outgoing.partner_id);

        self.tasks.push(tokio::spawn(async move {
            let partner_id = outgoing.partner_id.clone();
            match transport.deliver(outgoing).await {
                Ok(replies) => {
                    debug!("Delivery to {} produced {} replies", partner_id, replies.len());
                    for reply in replies {
                        if let Err(e) = inbound_tx.send(reply).await {
                            error!("Failed to forward reply from {}: {}", partner_id, e);
                            break;
                        }
                    }
                }
                Err(e) => error!("Delivery to {} failed: {}", partner_id, e),
            }
        }));
    }

    /// Deliveries that have not finished yet.
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }
}

impl Drop for DeliveryQueue {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
