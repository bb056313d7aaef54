// Append-only message store shared by every conversation

use log::debug;
use tokio::sync::mpsc;

use crate::media::ImageRef;
use crate::models::{Message, MessageId};

const OBSERVER_CAPACITY: usize = 64;

/// Notification sent to observers after every append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appended {
    pub id: MessageId,
    pub partner_id: String,
}

#[derive(Debug, Default)]
pub struct ThreadStore {
    messages: Vec<Message>,
    observers: Vec<mpsc::Sender<Appended>>,
}

impl ThreadStore {
    pub fn new(messages: Vec<Message>) -> Self {
        ThreadStore {
            messages,
            observers: Vec::new(),
        }
    }

    /// Register a scroll-to-end observer.
    pub fn subscribe(&mut self) -> mpsc::Receiver<Appended> {
        let (tx, rx) = mpsc::channel(OBSERVER_CAPACITY);
        self.observers.push(tx);
        rx
    }

    pub fn append(&mut self, message: Message) {
        let event = Appended {
            id: message.id,
            partner_id: message.partner_id.clone(),
        };
        self.messages.push(message);

        // Don't block on observers; a full queue only loses a redundant scroll hint
        self.observers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("Append observer is full, skipping {}", event.id);
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }

    /// Messages for one partner in insertion order.
    pub fn messages_for(&self, partner_id: &str) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.partner_id == partner_id)
            .collect()
    }

    /// Images shared with one partner in insertion order.
    pub fn images_for(&self, partner_id: &str) -> Vec<&ImageRef> {
        self.messages
            .iter()
            .filter(|m| m.partner_id == partner_id)
            .filter_map(|m| m.image.as_ref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
