use std::fmt;

use crate::media::ImageRef;

/// A counterpart in a one-to-one conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Partner {
    pub id: String,
    pub display_name: String,
    pub presence: Presence,
    pub last_preview: String,
    pub unread_count: u32,
    pub avatar_tag: String,
}

impl Partner {
    pub fn new(id: &str, display_name: &str, presence: Presence) -> Self {
        Partner {
            id: id.to_string(),
            display_name: display_name.to_string(),
            presence,
            last_preview: String::new(),
            unread_count: 0,
            avatar_tag: String::new(),
        }
    }

    /// Upper-cased first character of the display name, used as the avatar.
    pub fn initial(&self) -> String {
        self.display_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    /// The text shown under the name in the directory.
    pub fn preview(&self) -> &str {
        if self.last_preview.is_empty() {
            "No messages yet"
        } else {
            &self.last_preview
        }
    }

    /// Presence line shown in the conversation header.
    pub fn presence_label(&self) -> &'static str {
        match self.presence {
            Presence::Online => "Online",
            Presence::Offline => "Active 10 mins ago",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    Offline,
}

/// Which side of the conversation wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Own,   // Written by the local user
    Other, // Written by the partner
}

/// Monotonic message identifier, displayed as `msg-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub partner_id: String,
    pub side: Side,
    pub body: String,
    pub image: Option<ImageRef>,
    pub timestamp: u64,
}

impl Message {
    pub fn text(id: u64, partner_id: &str, side: Side, body: &str, timestamp: u64) -> Self {
        Message {
            id: MessageId(id),
            partner_id: partner_id.to_string(),
            side,
            body: body.to_string(),
            image: None,
            timestamp,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
