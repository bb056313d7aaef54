// Seed data for the chat route

use chrono::{Local, TimeZone};

use crate::conversation::{ChatError, ConversationView};
use crate::models::{Message, Partner, Presence, Side};

/// Partner whose conversation is open when the chat route mounts.
pub const INITIAL_PARTNER: &str = "user2";

fn partner(id: &str, name: &str, presence: Presence, preview: &str, unread: u32, avatar: &str) -> Partner {
    Partner {
        id: id.to_string(),
        display_name: name.to_string(),
        presence,
        last_preview: preview.to_string(),
        unread_count: unread,
        avatar_tag: avatar.to_string(),
    }
}

fn at(hour: u32, minute: u32) -> u64 {
    Local
        .with_ymd_and_hms(2025, 5, 10, hour, minute, 0)
        .earliest()
        .map(|t| t.timestamp() as u64)
        .unwrap_or_default()
}

pub fn partners() -> Vec<Partner> {
    vec![
        partner("user1", "Lily", Presence::Online, "Always on holidays", 0, "gray-700"),
        partner("user2", "Zoe", Presence::Offline, "Great! Good luck with your ne...", 0, "gray-600"),
        partner("user3", "Joe", Presence::Offline, "Sleeping", 0, "gray-500"),
        partner("user4", "Emily", Presence::Online, "Are you there?", 3, "gray-800"),
    ]
}

pub fn messages() -> Vec<Message> {
    vec![
        Message::text(1, "user2", Side::Own, "Hi Zoe!", at(10, 0)),
        Message::text(2, "user2", Side::Own, "Hi, what's up?", at(10, 1)),
        Message::text(
            3,
            "user2",
            Side::Other,
            "I am pleased to announce that on this beautiful magical day of the Fall Equinox, \
             we have released the first version of the chat-ui-kit-react library",
            at(10, 2),
        ),
        Message::text(4, "user2", Side::Own, "That's great news! you must be very excited", at(10, 3)),
        Message::text(5, "user2", Side::Other, "Yes I am :)", at(10, 4)),
        Message::text(6, "user2", Side::Own, "I am so proud of your team :)", at(10, 5)),
        Message::text(7, "user2", Side::Own, "Good luck with your new product!", at(10, 6)),
        Message::text(8, "user2", Side::Other, "Thank You :)", at(10, 7)),
        Message::text(9, "user1", Side::Own, "Hey Lily, how's it going?", at(9, 0)),
        Message::text(10, "user1", Side::Other, "Pretty good, just chilling!", at(9, 1)),
    ]
}

/// The view mounted by the chat route.
pub fn conversation() -> Result<ConversationView, ChatError> {
    Ok(ConversationView::new(partners(), messages())?.with_active_partner(INITIAL_PARTNER))
}
