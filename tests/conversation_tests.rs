mod common;

use std::time::{Duration, Instant};

use tempfile::TempDir;

use parley::delivery::Inbound;
use parley::media::AttachError;
use parley::view::{MainPane, ViewState, ViewportClass};
use parley::{ChatError, Message, MessageId, Partner, Presence, Side};

use common::{png, seeded_view, write_file};

#[test]
fn test_search_is_case_insensitive() {
    let mut view = seeded_view();

    let names = |view: &parley::ConversationView| -> Vec<String> {
        view.directory().filtered().iter().map(|p| p.display_name.clone()).collect()
    };

    view.set_search("ZO");
    assert_eq!(names(&view), vec!["Zoe"]);

    view.set_search("e");
    assert_eq!(names(&view), vec!["Zoe", "Joe", "Emily"]);

    view.set_search("");
    assert_eq!(view.directory().filtered().len(), 4);

    view.set_search("nobody");
    assert!(view.directory().filtered().is_empty());
}

#[test]
fn test_selecting_partner_filters_thread() {
    let mut view = seeded_view();
    assert_eq!(view.visible_messages().len(), 8);

    assert!(view.select("user1"));
    let visible = view.visible_messages();
    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|m| m.partner_id == "user1"));

    // Joe has no history
    assert!(view.select("user3"));
    assert!(view.visible_messages().is_empty());

    assert!(!view.select("user99"));
    assert_eq!(view.active_partner().map(|p| p.id.as_str()), Some("user3"));
}

#[test]
fn test_submit_appends_and_clears_draft() {
    let mut view = seeded_view();
    view.select("user2");
    let now = Instant::now();

    view.set_draft_text("Hello", now);
    assert!(view.is_typing());

    let outgoing = view.submit().expect("draft has text");
    assert_eq!(outgoing.partner_id, "user2");
    assert_eq!(outgoing.body, "Hello");
    assert!(!outgoing.has_image);

    let last = view.visible_messages().last().map(|m| (*m).clone()).expect("message stored");
    assert_eq!(last.id, MessageId(11));
    assert_eq!(last.side, Side::Own);
    assert_eq!(last.body, "Hello");

    assert_eq!(view.composer().text(), "");
    assert!(!view.is_typing());
}

#[test]
fn test_blank_submit_is_ignored() {
    let mut view = seeded_view();
    view.select("user2");
    let before = view.thread().len();

    view.set_draft_text("   ", Instant::now());
    assert!(view.submit().is_none());
    assert_eq!(view.thread().len(), before);
    assert_eq!(view.composer().text(), "   ");
}

#[test]
fn test_submit_without_partner_is_ignored() {
    let mut view = seeded_view();
    view.select("user2");
    assert!(view.back(ViewportClass::Compact));
    assert!(view.active_partner().is_none());

    view.set_draft_text("Anyone?", Instant::now());
    assert!(view.submit().is_none());
    assert_eq!(view.thread().len(), 10);
}

#[test]
fn test_typing_indicator_expires() {
    let mut view = seeded_view().with_typing_idle(Duration::from_millis(500));
    let start = Instant::now();

    view.set_draft_text("H", start);
    assert!(view.is_typing());

    view.set_draft_text("Hi", start + Duration::from_millis(400));
    assert!(!view.tick(start + Duration::from_millis(600)));
    assert!(view.is_typing());

    assert!(view.tick(start + Duration::from_millis(901)));
    assert!(!view.is_typing());
}

#[test]
fn test_image_only_message() {
    let dir = TempDir::new().unwrap();
    let mut view = seeded_view();
    view.select("user2");

    view.attach(&png(&dir, "sunset.png")).expect("png is an image");
    assert_eq!(view.composer().placeholder(), "Add a caption...");

    let outgoing = view.submit().expect("an image alone can be sent");
    assert!(outgoing.has_image);
    assert_eq!(outgoing.body, "");

    let gallery = view.gallery();
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0].file_name(), "sunset.png");
    assert!(view.composer().image().is_none());
}

#[test]
fn test_non_image_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut view = seeded_view();
    let notes = write_file(&dir, "notes.txt", b"not a picture");

    match view.attach(&notes) {
        Err(AttachError::NotAnImage { file, mime }) => {
            assert_eq!(file, "notes.txt");
            assert_eq!(mime, "text/plain");
        }
        other => panic!("Expected NotAnImage, got {:?}", other),
    }
    assert!(view.composer().image().is_none());
    assert_eq!(view.media().live(), 0);
}

#[test]
fn test_missing_image_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut view = seeded_view();

    let result = view.attach(&dir.path().join("gone.jpg"));
    assert!(matches!(result, Err(AttachError::Io { .. })));
    assert!(view.composer().image().is_none());
}

#[test]
fn test_replaced_and_removed_images_are_released() {
    let dir = TempDir::new().unwrap();
    let mut view = seeded_view();

    view.attach(&png(&dir, "one.png")).unwrap();
    view.attach(&png(&dir, "two.png")).unwrap();
    assert_eq!(view.composer().image().map(|i| i.file_name()), Some("two.png"));
    assert_eq!(view.media().live(), 1);

    assert!(view.remove_image());
    assert_eq!(view.media().live(), 0);
    assert!(!view.remove_image());
}

#[test]
fn test_sent_image_stays_live_with_message() {
    let dir = TempDir::new().unwrap();
    let mut view = seeded_view();
    view.select("user2");

    view.attach(&png(&dir, "kept.png")).unwrap();
    view.set_draft_text("look", Instant::now());
    view.submit().unwrap();

    assert_eq!(view.media().live(), 1);
}

#[test]
fn test_gallery_lists_every_shared_image() {
    let dir = TempDir::new().unwrap();
    let mut view = seeded_view();
    view.select("user2");

    for name in ["a.png", "b.jpg", "c.gif"] {
        view.attach(&png(&dir, name)).unwrap();
        view.submit().unwrap();
    }
    let names: Vec<&str> = view.gallery().iter().map(|i| i.file_name()).collect();
    assert_eq!(names, vec!["a.png", "b.jpg", "c.gif"]);

    // Images stay with their partner
    view.select("user1");
    assert!(view.gallery().is_empty());
}

#[test]
fn test_gallery_and_viewer_navigation() {
    let dir = TempDir::new().unwrap();
    let mut view = seeded_view();
    view.select("user2");
    view.attach(&png(&dir, "full.png")).unwrap();
    view.submit().unwrap();

    assert!(view.show_media());
    assert_eq!(view.view_state(), ViewState::MediaGallery);

    let image = view.gallery()[0].clone();
    view.open_image(image.clone());
    assert_eq!(view.view_state(), ViewState::FullScreenImage(image.clone()));
    assert_eq!(view.effective_view(ViewportClass::Wide).overlay, Some(image));

    assert!(view.back(ViewportClass::Wide));
    assert_eq!(view.view_state(), ViewState::MediaGallery);
    assert!(view.back(ViewportClass::Wide));
    assert_eq!(view.view_state(), ViewState::Conversation);

    // The directory is always beside the conversation on wide screens
    assert!(!view.back(ViewportClass::Wide));
    assert_eq!(view.active_partner().map(|p| p.id.as_str()), Some("user2"));
}

#[test]
fn test_show_media_requires_partner() {
    let mut view = seeded_view();
    view.select("user2");
    view.back(ViewportClass::Compact);
    assert!(!view.show_media());
    assert_eq!(view.view_state(), ViewState::Directory);
}

#[test]
fn test_layout_follows_viewport() {
    let mut view = seeded_view();

    let compact = view.effective_view(ViewportClass::Compact);
    assert!(compact.directory);
    assert_eq!(compact.main, None);

    view.select("user4");
    let compact = view.effective_view(ViewportClass::Compact);
    assert!(!compact.directory);
    assert_eq!(compact.main, Some(MainPane::Conversation));

    // Resizing does not change where the user is
    let wide = view.effective_view(ViewportClass::Wide);
    assert!(wide.directory);
    assert_eq!(wide.main, Some(MainPane::Conversation));
    assert_eq!(view.view_state(), ViewState::Conversation);

    view.show_media();
    assert_eq!(view.effective_view(ViewportClass::Compact).main, Some(MainPane::MediaGallery));
    assert_eq!(view.effective_view(ViewportClass::Wide).main, Some(MainPane::MediaGallery));
}

#[test]
fn test_selecting_closes_gallery() {
    let mut view = seeded_view();
    view.select("user2");
    view.show_media();

    view.select("user1");
    assert_eq!(view.view_state(), ViewState::Conversation);
}

#[test]
fn test_receive_appends_and_notifies() {
    let mut view = seeded_view();
    let mut appended = view.subscribe();

    let id = view
        .receive(Inbound {
            partner_id: "user2".to_string(),
            body: "Thanks for the message! How can I assist you further?".to_string(),
        })
        .unwrap();
    assert_eq!(id, MessageId(11));

    let event = appended.try_recv().expect("observer notified");
    assert_eq!(event.id, id);
    assert_eq!(event.partner_id, "user2");

    let last = view.visible_messages().last().map(|m| m.side);
    assert_eq!(last, Some(Side::Other));
}

#[test]
fn test_receive_from_stranger_fails() {
    let mut view = seeded_view();
    let result = view.receive(Inbound {
        partner_id: "user42".to_string(),
        body: "hi".to_string(),
    });
    assert!(matches!(result, Err(ChatError::UnknownPartner { .. })));
    assert_eq!(view.thread().len(), 10);
}

#[test]
fn test_reply_lands_with_sending_partner() {
    let mut view = seeded_view();
    view.select("user2");
    view.set_draft_text("ping", Instant::now());
    let outgoing = view.submit().unwrap();

    view.select("user1");
    view.receive(Inbound {
        partner_id: outgoing.partner_id,
        body: "pong".to_string(),
    })
    .unwrap();

    assert!(view.visible_messages().iter().all(|m| m.body != "pong"));
    view.select("user2");
    assert_eq!(view.visible_messages().last().map(|m| m.body.as_str()), Some("pong"));
}

#[test]
fn test_orphan_messages_are_rejected() {
    let partners = vec![Partner::new("a", "Ann", Presence::Online)];
    let messages = vec![Message::text(1, "b", Side::Own, "hello?", 0)];

    match parley::ConversationView::new(partners, messages) {
        Err(ChatError::UnknownPartner { message, partner_id }) => {
            assert_eq!(message, "msg-1");
            assert_eq!(partner_id, "b");
        }
        Ok(_) => panic!("Expected UnknownPartner"),
    }
}

#[test]
fn test_ids_continue_after_sparse_seed() {
    let partners = vec![Partner::new("a", "Ann", Presence::Online)];
    let messages = vec![Message::text(40, "a", Side::Other, "late", 0)];
    let mut view = parley::ConversationView::new(partners, messages)
        .unwrap()
        .with_active_partner("a");

    view.set_draft_text("next", Instant::now());
    view.submit().unwrap();
    assert_eq!(view.visible_messages().last().map(|m| m.id), Some(MessageId(41)));
}

#[test]
fn test_long_form_composer() {
    let mut view = seeded_view();
    let now = Instant::now();

    view.set_draft_text(&"x".repeat(149), now);
    assert!(!view.composer().is_long_form());

    view.set_draft_text(&"x".repeat(150), now);
    assert!(view.composer().is_long_form());
}

#[test]
fn test_message_drop_releases_image() {
    use parley::media::MediaLibrary;
    use parley::thread::ThreadStore;

    let mut library = MediaLibrary::new();
    let image = library.register("beach.webp", "image/webp", 2048).unwrap();

    let mut message = Message::text(1, "user2", Side::Own, "", 0);
    message.image = Some(image);
    let mut store = ThreadStore::new(Vec::new());
    store.append(message);
    assert_eq!(store.images_for("user2").len(), 1);
    assert_eq!(library.live(), 1);

    drop(store);
    assert_eq!(library.live(), 0);
}
