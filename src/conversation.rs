// ConversationView: directory, thread store, composer and navigation in one place

use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::composer::{Composer, TypingStatus};
use crate::delivery::{Inbound, Outgoing};
use crate::directory::Directory;
use crate::media::{AttachError, ImageRef, MediaLibrary};
use crate::models::{Message, MessageId, Partner, Side};
use crate::thread::{Appended, ThreadStore};
use crate::view::{self, Back, EffectiveView, Navigation, ViewState, ViewportClass};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message {message} references unknown partner {partner_id}")]
    UnknownPartner { message: String, partner_id: String },
}

pub struct ConversationView {
    directory: Directory,
    thread: ThreadStore,
    composer: Composer,
    media: MediaLibrary,
    nav: Navigation,
    active: Option<String>,
    next_id: u64,
}

impl ConversationView {
    /// Build a view over a roster and its seeded history. Every seeded message
    /// must belong to a partner in the roster.
    pub fn new(partners: Vec<Partner>, messages: Vec<Message>) -> Result<Self, ChatError> {
        let directory = Directory::new(partners);
        if let Some(orphan) = messages.iter().find(|m| !directory.contains(&m.partner_id)) {
            return Err(ChatError::UnknownPartner {
                message: orphan.id.to_string(),
                partner_id: orphan.partner_id.clone(),
            });
        }

        let highest = messages.iter().map(|m| m.id.0).max().unwrap_or(0);
        let next_id = highest.max(messages.len() as u64) + 1;
        info!(
            "Conversation view ready with {} partners and {} messages",
            directory.partners().len(),
            messages.len()
        );

        Ok(ConversationView {
            directory,
            thread: ThreadStore::new(messages),
            composer: Composer::default(),
            media: MediaLibrary::new(),
            nav: Navigation::new(),
            active: None,
            next_id,
        })
    }

    pub fn with_typing_idle(mut self, idle_after: Duration) -> Self {
        self.composer = Composer::new(idle_after);
        self
    }

    /// Pre-select a partner without leaving the directory.
    pub fn with_active_partner(mut self, partner_id: &str) -> Self {
        if self.directory.contains(partner_id) {
            self.active = Some(partner_id.to_string());
        } else {
            warn!("Ignoring unknown initial partner {}", partner_id);
        }
        self
    }

    // --- Directory ---

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn set_search(&mut self, query: &str) {
        self.directory.set_query(query);
    }

    pub fn select(&mut self, partner_id: &str) -> bool {
        if !self.directory.contains(partner_id) {
            warn!("Cannot select unknown partner {}", partner_id);
            return false;
        }
        debug!("Selected partner {}", partner_id);
        self.active = Some(partner_id.to_string());
        self.nav.select_partner();
        true
    }

    pub fn active_partner(&self) -> Option<&Partner> {
        self.active.as_deref().and_then(|id| self.directory.get(id))
    }

    // --- Thread ---

    pub fn thread(&self) -> &ThreadStore {
        &self.thread
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<Appended> {
        self.thread.subscribe()
    }

    /// Messages of the active conversation.
    pub fn visible_messages(&self) -> Vec<&Message> {
        match &self.active {
            Some(id) => self.thread.messages_for(id),
            None => Vec::new(),
        }
    }

    /// Images of the active conversation, i.e. the gallery thumbnails.
    pub fn gallery(&self) -> Vec<&ImageRef> {
        match &self.active {
            Some(id) => self.thread.images_for(id),
            None => Vec::new(),
        }
    }

    // --- Composer ---

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn media(&self) -> &MediaLibrary {
        &self.media
    }

    pub fn set_draft_text(&mut self, text: &str, now: Instant) {
        self.composer.set_text(text, now);
    }

    /// Advance timers. Returns true when something visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.composer.tick(now)
    }

    /// The typing indicator is only drawn inside an open conversation.
    pub fn is_typing(&self) -> bool {
        self.active.is_some() && self.composer.typing_status() == TypingStatus::Typing
    }

    /// Attach an image file to the draft. A rejected file leaves the draft as
    /// it was; the caller is expected to only log the error.
    pub fn attach(&mut self, path: &Path) -> Result<(), AttachError> {
        match self.media.acquire(path) {
            Ok(image) => {
                info!("Attached {} to draft", image.file_name());
                if let Some(replaced) = self.composer.attach(image) {
                    debug!("Discarded previously attached {}", replaced.file_name());
                }
                Ok(())
            }
            Err(e) => {
                warn!("Attachment rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn remove_image(&mut self) -> bool {
        self.composer.remove_image().is_some()
    }

    /// Send the draft to the active partner.
    ///
    /// Returns the message to hand to the delivery channel, or `None` when
    /// the draft is blank or nobody is selected.
    pub fn submit(&mut self) -> Option<Outgoing> {
        let partner_id = self.active.clone()?;
        if !self.composer.can_send() {
            return None;
        }

        let draft = self.composer.take();
        let has_image = draft.image.is_some();
        let message = Message {
            id: self.issue_id(),
            partner_id: partner_id.clone(),
            side: Side::Own,
            body: draft.text,
            image: draft.image,
            timestamp: now_timestamp(),
        };
        let outgoing = Outgoing {
            partner_id,
            body: message.body.clone(),
            has_image,
        };

        info!("Sent {} to {}", message.id, outgoing.partner_id);
        self.thread.append(message);
        Some(outgoing)
    }

    /// Append a message that arrived from a partner.
    pub fn receive(&mut self, inbound: Inbound) -> Result<MessageId, ChatError> {
        if !self.directory.contains(&inbound.partner_id) {
            return Err(ChatError::UnknownPartner {
                message: "inbound".to_string(),
                partner_id: inbound.partner_id,
            });
        }

        let id = self.issue_id();
        debug!("Received {} from {}", id, inbound.partner_id);
        self.thread.append(Message {
            id,
            partner_id: inbound.partner_id,
            side: Side::Other,
            body: inbound.body,
            image: None,
            timestamp: now_timestamp(),
        });
        Ok(id)
    }

    // --- Navigation ---

    pub fn view_state(&self) -> ViewState {
        self.nav.state()
    }

    pub fn effective_view(&self, viewport: ViewportClass) -> EffectiveView {
        view::effective_view(&self.nav, viewport)
    }

    pub fn show_media(&mut self) -> bool {
        if self.active.is_none() {
            return false;
        }
        self.nav.show_media();
        true
    }

    pub fn open_image(&mut self, image: ImageRef) {
        self.nav.open_image(image);
    }

    pub fn close_image(&mut self) -> bool {
        self.nav.close_image()
    }

    /// Returns false when there was nothing to go back to.
    pub fn back(&mut self, viewport: ViewportClass) -> bool {
        match self.nav.back(viewport) {
            Back::ToDirectory => {
                self.active = None;
                true
            }
            Back::ClosedImage | Back::ToConversation => true,
            Back::Stay => false,
        }
    }

    fn issue_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn now_timestamp() -> u64 {
    chrono::Utc::now().timestamp() as u64
}
