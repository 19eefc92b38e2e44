//! Conversation history views
//!
//! Builds the two renderings of a message sequence that callers can ask
//! for: a role-tagged transcript fed to the LLM context window, and a
//! timestamp-ordered list for display. The same algorithm serves both a
//! single chat and all chats of a user; inputs arrive in insertion order
//! and ties on equal timestamps keep that order (stable sort).

use scribe_common::{ConversationView, DEFAULT_HISTORY_LIMIT, MessageData};

/// Which views to build and how to order them
#[derive(Debug, Clone, Copy)]
pub struct HistoryRequest {
    /// Number of most-recent messages included in the transcript
    pub limit: usize,
    /// Build the role-tagged transcript
    pub formatted: bool,
    /// Build the timestamp-sorted list
    pub sorted: bool,
    /// Sort ascending (oldest first) rather than descending
    pub oldest_first: bool,
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            formatted: true,
            sorted: true,
            oldest_first: true,
        }
    }
}

/// Build the requested views from messages in insertion order
///
/// Views that were not requested come back as `None`, so callers can tell
/// "not asked for" apart from "asked for, but the conversation is empty".
pub fn build_view(messages: &[MessageData], request: HistoryRequest) -> ConversationView {
    let transcript = request
        .formatted
        .then(|| render_transcript(messages, request.limit));
    let sorted = request
        .sorted
        .then(|| sort_by_timestamp(messages, request.oldest_first));
    ConversationView { transcript, sorted }
}

/// Render the last `limit` messages as a role-tagged transcript
///
/// The clip keeps original chronological order - the tail of the
/// conversation, not a re-sorted selection. Each message is followed by a
/// blank line, the shape the prompt templates expect.
fn render_transcript(messages: &[MessageData], limit: usize) -> String {
    let start = messages.len().saturating_sub(limit);
    let mut transcript = String::new();
    for message in &messages[start..] {
        transcript.push_str(message.sender.label());
        transcript.push_str(": ");
        transcript.push_str(&message.content);
        transcript.push_str("\n\n");
    }
    transcript
}

/// Stable-sort the full message set by timestamp
fn sort_by_timestamp(messages: &[MessageData], oldest_first: bool) -> Vec<MessageData> {
    let mut sorted = messages.to_vec();
    if oldest_first {
        sorted.sort_by_key(|m| m.timestamp);
    } else {
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
    sorted
}
