//! Scribe Common Library
//!
//! Shared types and validators for the Scribe document-chat backend.

pub mod protocol;
pub mod validators;

pub use protocol::{
    AuthInfo, ChatCreated, ChatSummary, ConversationView, MessageCreated, MessageData, Role,
    Sender, UserSummary,
};

/// Number of messages included in a formatted transcript by default
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Title given to chats created without one
pub const DEFAULT_CHAT_TITLE: &str = "--Untitled--";
