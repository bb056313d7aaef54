// View routing
//
// Navigation state is only ever written by user actions. What is actually on
// screen comes from `effective_view`, which combines it with the viewport class.

use log::debug;

use crate::media::ImageRef;

/// Terminal width (in columns) at which the directory and conversation are
/// shown side by side.
pub const DEFAULT_BREAKPOINT: u16 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportClass {
    Compact,
    Wide,
}

impl ViewportClass {
    pub fn from_width(width: u16, breakpoint: u16) -> Self {
        if width >= breakpoint {
            ViewportClass::Wide
        } else {
            ViewportClass::Compact
        }
    }
}

/// The pane the user navigated to, ignoring the image viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Directory,
    Conversation,
    MediaGallery,
}

/// Which top-level pane is currently presented.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewState {
    Directory,
    Conversation,
    MediaGallery,
    FullScreenImage(ImageRef),
}

/// Outcome of a back action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Back {
    ClosedImage,
    ToConversation,
    ToDirectory,
    Stay,
}

#[derive(Clone, Debug, Default)]
pub struct Navigation {
    pane: Pane,
    viewer: Option<ImageRef>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        if let Some(image) = &self.viewer {
            return ViewState::FullScreenImage(image.clone());
        }
        match self.pane {
            Pane::Directory => ViewState::Directory,
            Pane::Conversation => ViewState::Conversation,
            Pane::MediaGallery => ViewState::MediaGallery,
        }
    }

    pub fn select_partner(&mut self) {
        self.pane = Pane::Conversation;
        self.viewer = None;
    }

    pub fn show_media(&mut self) {
        self.pane = Pane::MediaGallery;
    }

    pub fn open_image(&mut self, image: ImageRef) {
        debug!("Opening image viewer for {}", image.file_name());
        self.viewer = Some(image);
    }

    pub fn close_image(&mut self) -> bool {
        self.viewer.take().is_some()
    }

    /// Step back one level. Leaving a conversation for the directory only
    /// exists on compact viewports, where the two never share the screen.
    pub fn back(&mut self, viewport: ViewportClass) -> Back {
        if self.close_image() {
            return Back::ClosedImage;
        }
        match (self.pane, viewport) {
            (Pane::MediaGallery, _) => {
                self.pane = Pane::Conversation;
                Back::ToConversation
            }
            (Pane::Conversation, ViewportClass::Compact) => {
                self.pane = Pane::Directory;
                Back::ToDirectory
            }
            _ => Back::Stay,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MainPane {
    Conversation,
    MediaGallery,
}

/// What is drawn for a navigation state on a given viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveView {
    pub directory: bool,
    pub main: Option<MainPane>,
    pub overlay: Option<ImageRef>,
}

pub fn effective_view(nav: &Navigation, viewport: ViewportClass) -> EffectiveView {
    let overlay = nav.viewer.clone();
    match viewport {
        ViewportClass::Wide => EffectiveView {
            directory: true,
            main: Some(match nav.pane {
                Pane::MediaGallery => MainPane::MediaGallery,
                Pane::Directory | Pane::Conversation => MainPane::Conversation,
            }),
            overlay,
        },
        ViewportClass::Compact => match nav.pane {
            Pane::Directory => EffectiveView {
                directory: true,
                main: None,
                overlay,
            },
            Pane::Conversation => EffectiveView {
                directory: false,
                main: Some(MainPane::Conversation),
                overlay,
            },
            Pane::MediaGallery => EffectiveView {
                directory: false,
                main: Some(MainPane::MediaGallery),
                overlay,
            },
        },
    }
}
