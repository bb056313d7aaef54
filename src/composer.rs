// Draft state and the local typing indicator

use std::time::{Duration, Instant};

use crate::media::ImageRef;

pub const DEFAULT_TYPING_IDLE: Duration = Duration::from_secs(2);

/// Drafts at or above this many characters switch to the multi-line editor.
pub const LONG_FORM_THRESHOLD: usize = 150;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingStatus {
    Idle,
    Typing,
}

/// The not-yet-sent composer content.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub text: String,
    pub image: Option<ImageRef>,
}

impl Draft {
    /// A draft with whitespace-only text and no image cannot be sent.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.image.is_none()
    }
}

#[derive(Debug)]
pub struct Composer {
    draft: Draft,
    idle_after: Duration,
    typing_until: Option<Instant>,
}

impl Default for Composer {
    fn default() -> Self {
        Composer::new(DEFAULT_TYPING_IDLE)
    }
}

impl Composer {
    pub fn new(idle_after: Duration) -> Self {
        Composer {
            draft: Draft::default(),
            idle_after,
            typing_until: None,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn text(&self) -> &str {
        &self.draft.text
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.draft.image.as_ref()
    }

    /// Replace the draft text. Non-empty input (re)arms the idle deadline,
    /// empty input drops straight back to idle.
    pub fn set_text(&mut self, text: &str, now: Instant) {
        self.draft.text = text.to_string();
        self.typing_until = if self.draft.text.is_empty() {
            None
        } else {
            Some(now + self.idle_after)
        };
    }

    /// Expire the idle deadline. Returns true when the status changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.typing_until {
            Some(deadline) if now >= deadline => {
                self.typing_until = None;
                true
            }
            _ => false,
        }
    }

    pub fn typing_status(&self) -> TypingStatus {
        if self.typing_until.is_some() {
            TypingStatus::Typing
        } else {
            TypingStatus::Idle
        }
    }

    /// Attach an image, returning the one it replaced.
    pub fn attach(&mut self, image: ImageRef) -> Option<ImageRef> {
        self.draft.image.replace(image)
    }

    pub fn remove_image(&mut self) -> Option<ImageRef> {
        self.draft.image.take()
    }

    pub fn can_send(&self) -> bool {
        !self.draft.is_blank()
    }

    pub fn is_long_form(&self) -> bool {
        self.draft.text.chars().count() >= LONG_FORM_THRESHOLD
    }

    pub fn placeholder(&self) -> &'static str {
        if self.draft.image.is_some() {
            "Add a caption..."
        } else {
            "Type message here"
        }
    }

    /// Take the draft out, leaving an empty one behind.
    pub fn take(&mut self) -> Draft {
        self.typing_until = None;
        std::mem::take(&mut self.draft)
    }
}
