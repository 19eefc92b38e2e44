//! Result shapes shared between the persistence core and the routing layer
//!
//! These are plain data types: the persistence service produces them and the
//! HTTP layer serializes them onto the wire unchanged. Enum values are
//! serialized as their lowercase database strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
///
/// Only these two values are accepted; anything else is rejected at the
/// facade boundary before it can reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Convert to the string stored in the `users.role` column
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parse from the stored string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Convert to the string stored in the `chat_message.sender` column
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }

    /// Parse from the stored string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "bot" => Some(Self::Bot),
            _ => None,
        }
    }

    /// Role tag used when rendering a transcript for the LLM context window
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "[User]",
            Self::Bot => "[LLM]",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful authentication result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub user_id: i64,
    pub role: Role,
}

/// Account overview with the owned-chat count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub created_at: String,
    pub last_login: Option<String>,
    pub is_active: bool,
    pub chat_count: i64,
}

/// Chat metadata as shown in the sidebar listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub chat_id: i64,
    pub title: Option<String>,
    pub last_msg: Option<String>,
    pub created_at: String,
}

/// Result of creating a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCreated {
    pub chat_id: i64,
    pub title: String,
}

/// Result of appending a message to a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCreated {
    pub message_id: i64,
    pub content: String,
}

/// A single message in a conversation view
///
/// `timestamp` is unix epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    pub sender: Sender,
    pub content: String,
    pub timestamp: i64,
}

/// Conversation history in the two shapes callers can request
///
/// A `None` field means that view was not requested, which is distinct from
/// a requested view over an empty conversation (`Some("")` / `Some(vec![])`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationView {
    pub transcript: Option<String>,
    pub sorted: Option<Vec<MessageData>>,
}
