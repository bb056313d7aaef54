// Everything the chat route owns while it is on screen

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use tokio::sync::mpsc;

use crate::conversation::{ChatError, ConversationView};
use crate::delivery::{DeliveryQueue, Inbound, MessageDelivery, Outgoing};
use crate::sample;
use crate::thread::Appended;

/// A mounted chat: the seeded view plus its delivery queue and channels.
///
/// Dropping the session unmounts the chat and aborts replies still in flight.
pub struct ChatSession {
    view: ConversationView,
    delivery: DeliveryQueue,
    inbound_rx: mpsc::Receiver<Inbound>,
    appended_rx: mpsc::Receiver<Appended>,
}

impl ChatSession {
    /// Seed the sample conversation and wire it to `transport`.
    pub fn mount(transport: Arc<dyn MessageDelivery>, typing_idle: Duration) -> Result<Self, ChatError> {
        let mut view = sample::conversation()?.with_typing_idle(typing_idle);
        let appended_rx = view.subscribe();
        let (delivery, inbound_rx) = DeliveryQueue::new(transport);
        info!("Chat mounted");

        Ok(ChatSession {
            view,
            delivery,
            inbound_rx,
            appended_rx,
        })
    }

    pub fn view(&self) -> &ConversationView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ConversationView {
        &mut self.view
    }

    /// Hand a submitted message to the delivery queue. Needs a tokio runtime.
    pub fn send(&mut self, outgoing: Outgoing) {
        self.delivery.dispatch(outgoing);
    }

    pub fn pending(&self) -> usize {
        self.delivery.pending()
    }

    /// Store replies that arrived since the last call and return the append
    /// events the view produced meanwhile.
    pub fn drain(&mut self) -> Vec<Appended> {
        while let Ok(inbound) = self.inbound_rx.try_recv() {
            match self.view.receive(inbound) {
                Ok(id) => debug!("Stored reply {}", id),
                Err(e) => error!("Dropping reply: {}", e),
            }
        }

        let mut appended = Vec::new();
        while let Ok(event) = self.appended_rx.try_recv() {
            appended.push(event);
        }
        appended
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        info!("Chat unmounted with {} replies pending", self.delivery.pending());
    }
}
