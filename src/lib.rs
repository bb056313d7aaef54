// Re-export needed modules for testing
pub mod composer;
pub mod config;
pub mod conversation;
pub mod delivery;
pub mod directory;
pub mod media;
pub mod models;
pub mod sample;
pub mod session;
pub mod thread;
pub mod view;

// Re-export main types for convenience
pub use conversation::{ChatError, ConversationView};
pub use models::*;
