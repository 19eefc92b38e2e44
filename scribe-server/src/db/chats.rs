//! Chat and message database operations
//!
//! Chats are exclusively owned by one user; messages are exclusively
//! owned by one chat and immutable once written. Appending a message also
//! refreshes the chat's last-message preview in the same transaction.
//! Under concurrent appends to one chat the preview is last-writer-wins;
//! the message rows themselves serialize on the database writer and are
//! never lost.

use chrono::Utc;
use scribe_common::validators::{self, MessageError, TitleError};
use scribe_common::{
    ChatCreated, ChatSummary, ConversationView, DEFAULT_CHAT_TITLE, MessageCreated, MessageData,
    Sender,
};
use sqlx::SqlitePool;

use super::error::{self, DbError};
use super::history::{self, HistoryRequest};
use super::sql;

/// Row type for chat metadata queries
type ChatRow = (i64, Option<String>, Option<String>, String);

/// Row type for message queries
type MessageRow = (String, String, i64);

/// Map a message row, rejecting senders outside {user, bot}
///
/// A sender value the enum can't parse means the row was written outside
/// the facade; that is corruption, not absence.
pub(crate) fn message_from_row(row: MessageRow) -> Result<MessageData, DbError> {
    let sender = Sender::parse(&row.0)
        .ok_or_else(|| DbError::Persistence(format!("unknown sender '{}' in chat_message", row.0)))?;
    Ok(MessageData {
        sender,
        content: row.1,
        timestamp: row.2,
    })
}

fn title_error(err: TitleError) -> DbError {
    let msg = match err {
        TitleError::TooLong => "chat title is too long",
        TitleError::ContainsNewlines => "chat title contains newlines",
    };
    DbError::InvalidArgument(msg.to_string())
}

fn message_error(err: MessageError) -> DbError {
    let msg = match err {
        MessageError::TooLong => "message content is too long",
    };
    DbError::InvalidArgument(msg.to_string())
}

/// Database interface for chats and their messages
#[derive(Clone)]
pub struct ChatDb {
    pool: SqlitePool,
}

impl ChatDb {
    /// Create a new ChatDb instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a chat for a user
    ///
    /// Falls back to the default title when none is given. Owner
    /// existence is enforced by the foreign key on the insert itself;
    /// a violation reads back as `NotFound`.
    pub async fn create_chat(
        &self,
        user_id: i64,
        title: Option<&str>,
    ) -> Result<ChatCreated, DbError> {
        const OP: &str = "create_chat";

        if let Some(title) = title {
            validators::validate_title(title).map_err(title_error)?;
        }
        let title = title.unwrap_or(DEFAULT_CHAT_TITLE);
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(sql::SQL_INSERT_CHAT)
            .bind(user_id)
            .bind(title)
            .bind(&created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| error::fault_missing_ref(OP, e))?;

        let chat_id = result.last_insert_rowid();
        tracing::debug!(op = OP, chat_id, user_id, "chat created");
        Ok(ChatCreated {
            chat_id,
            title: title.to_string(),
        })
    }

    /// Get chat metadata for a user's sidebar listing
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub async fn get_chats_for_user(&self, user_id: i64) -> Result<Vec<ChatSummary>, DbError> {
        const OP: &str = "get_chats_for_user";

        let mut tx = self.pool.begin().await.map_err(|e| error::fault(OP, e))?;

        let exists: i64 = sqlx::query_scalar(sql::SQL_USER_EXISTS)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;
        if exists == 0 {
            tracing::debug!(op = OP, user_id, "user does not exist");
            return Err(DbError::NotFound);
        }

        let rows: Vec<ChatRow> = sqlx::query_as(sql::SQL_SELECT_CHATS_FOR_USER)
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        tx.commit().await.map_err(|e| error::fault(OP, e))?;

        Ok(rows
            .into_iter()
            .map(|(chat_id, title, last_msg, created_at)| ChatSummary {
                chat_id,
                title,
                last_msg,
                created_at,
            })
            .collect())
    }

    /// Append a message to a chat
    ///
    /// Inserts the message and refreshes the chat's preview in one
    /// transaction. The insert is the first statement, so the foreign key
    /// doubles as the existence check: an unknown chat reads back as
    /// `NotFound` and nothing is persisted.
    pub async fn add_message(
        &self,
        chat_id: i64,
        sender: &str,
        content: &str,
    ) -> Result<MessageCreated, DbError> {
        const OP: &str = "add_message";

        let sender = Sender::parse(sender)
            .ok_or_else(|| DbError::InvalidArgument(format!("unknown sender '{}'", sender)))?;
        validators::validate_message(content).map_err(message_error)?;
        let timestamp = Utc::now().timestamp_millis();

        let mut tx = self.pool.begin().await.map_err(|e| error::fault(OP, e))?;

        let result = sqlx::query(sql::SQL_INSERT_MESSAGE)
            .bind(chat_id)
            .bind(sender.as_str())
            .bind(content)
            .bind(timestamp)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::fault_missing_ref(OP, e))?;
        let message_id = result.last_insert_rowid();

        sqlx::query(sql::SQL_UPDATE_CHAT_LAST_MSG)
            .bind(content)
            .bind(chat_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        tx.commit().await.map_err(|e| error::fault(OP, e))?;

        tracing::debug!(op = OP, chat_id, message_id, "message appended");
        Ok(MessageCreated {
            message_id,
            content: content.to_string(),
        })
    }

    /// Build the requested conversation views for one chat
    ///
    /// # Errors
    ///
    /// `NotFound` if the chat does not exist.
    pub async fn get_chat_messages(
        &self,
        chat_id: i64,
        request: HistoryRequest,
    ) -> Result<ConversationView, DbError> {
        const OP: &str = "get_chat_messages";

        let mut tx = self.pool.begin().await.map_err(|e| error::fault(OP, e))?;

        let exists: i64 = sqlx::query_scalar(sql::SQL_CHAT_EXISTS)
            .bind(chat_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;
        if exists == 0 {
            tracing::debug!(op = OP, chat_id, "chat does not exist");
            return Err(DbError::NotFound);
        }

        let rows: Vec<MessageRow> = sqlx::query_as(sql::SQL_SELECT_MESSAGES_FOR_CHAT)
            .bind(chat_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        tx.commit().await.map_err(|e| error::fault(OP, e))?;

        let messages = rows
            .into_iter()
            .map(message_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history::build_view(&messages, request))
    }

    /// Delete a chat and its messages
    ///
    /// Messages first, then the chat row, one transaction.
    pub async fn delete_chat(&self, chat_id: i64) -> Result<(), DbError> {
        const OP: &str = "delete_chat";

        let mut tx = self.pool.begin().await.map_err(|e| error::fault(OP, e))?;

        sqlx::query(sql::SQL_DELETE_MESSAGES_FOR_CHAT)
            .bind(chat_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        let result = sqlx::query(sql::SQL_DELETE_CHAT)
            .bind(chat_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(op = OP, chat_id, "chat does not exist");
            return Err(DbError::NotFound);
        }

        tx.commit().await.map_err(|e| error::fault(OP, e))?;

        tracing::debug!(op = OP, chat_id, "chat deleted");
        Ok(())
    }

    /// Count messages in a chat
    #[cfg(test)]
    pub async fn count_messages(&self, chat_id: i64) -> i64 {
        sqlx::query_scalar(sql::SQL_COUNT_MESSAGES_FOR_CHAT)
            .bind(chat_id)
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }
}
