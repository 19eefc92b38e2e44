//! SQL query constants for database operations
//!
//! This module contains all SQL queries used by the database layer.
//! Each query is documented with its parameters and special behaviors.

// ========================================================================
// User Query Operations
// ========================================================================

/// Insert a new user account
///
/// **Parameters:**
/// 1. `username: &str` - Account name (unique, case-insensitive)
/// 2. `password_hash: &str` - Serialized credential record
/// 3. `role: &str` - "admin" or "user"
/// 4. `created_at: &str` - RFC 3339 timestamp
///
/// **Returns:** `last_insert_rowid()` - The new user's ID
///
/// **Note:** New accounts start active. A duplicate username violates the
/// unique constraint and surfaces as a persistence error.
pub const SQL_INSERT_USER: &str =
    "INSERT INTO users (username, password_hash, role, created_at, is_active) VALUES (?, ?, ?, ?, 1)";

/// Select an active user by username (case-insensitive lookup)
///
/// **Parameters:**
/// 1. `username: &str` - Username to search for
///
/// **Returns:** `(id, username, password_hash, role, created_at, last_login, is_active)`
///
/// **Note:** Deactivated accounts are filtered out here, so a correct
/// password against a disabled account still reads as "no such user".
pub const SQL_SELECT_ACTIVE_USER_BY_USERNAME: &str = "SELECT id, username, password_hash, role, created_at, last_login, is_active FROM users WHERE LOWER(username) = LOWER(?) AND is_active = 1";

/// Select a user by ID
///
/// **Parameters:**
/// 1. `user_id: i64` - User ID to look up
///
/// **Returns:** `(id, username, password_hash, role, created_at, last_login, is_active)`
pub const SQL_SELECT_USER_BY_ID: &str = "SELECT id, username, password_hash, role, created_at, last_login, is_active FROM users WHERE id = ?";

/// Select all user summaries with their chat counts
///
/// **Parameters:** None
///
/// **Returns:** Multiple rows of `(id, username, role, created_at, last_login, is_active, chat_count)`
///
/// **Note:** Results are sorted alphabetically by username (case-insensitive).
pub const SQL_SELECT_USER_SUMMARIES: &str = "
    SELECT
        u.id,
        u.username,
        u.role,
        u.created_at,
        u.last_login,
        u.is_active,
        COUNT(c.id) AS chat_count
    FROM users u
    LEFT JOIN chats c ON c.user_id = u.id
    GROUP BY u.id
    ORDER BY LOWER(u.username)";

/// Count chats owned by a user
///
/// **Parameters:**
/// 1. `user_id: i64` - Owning user ID
///
/// **Returns:** `(count: i64)`
pub const SQL_COUNT_CHATS_FOR_USER: &str = "SELECT COUNT(*) FROM chats WHERE user_id = ?";

/// Count all user accounts
///
/// **Parameters:** None
///
/// **Returns:** `(count: i64)`
pub const SQL_COUNT_USERS: &str = "SELECT COUNT(*) FROM users";

/// Check whether a user exists
///
/// **Parameters:**
/// 1. `user_id: i64` - User ID to check
///
/// **Returns:** `(count: i64)` - 1 if the user exists, 0 if not
pub const SQL_USER_EXISTS: &str = "SELECT COUNT(*) FROM users WHERE id = ?";

// ========================================================================
// User Mutation Operations
// ========================================================================

/// Record a successful login
///
/// **Parameters:**
/// 1. `last_login: &str` - Formatted login timestamp
/// 2. `user_id: i64` - User ID
pub const SQL_UPDATE_LAST_LOGIN: &str = "UPDATE users SET last_login = ? WHERE id = ?";

/// Enable or disable an account
///
/// **Parameters:**
/// 1. `is_active: bool` - New active state
/// 2. `user_id: i64` - User ID
///
/// **Note:** Setting the current state again is a no-op success; the row
/// still counts as affected, which keeps the transition idempotent.
pub const SQL_SET_USER_ACTIVE: &str = "UPDATE users SET is_active = ? WHERE id = ?";

/// Change an account's role
///
/// **Parameters:**
/// 1. `role: &str` - "admin" or "user" (validated before binding)
/// 2. `user_id: i64` - User ID
pub const SQL_UPDATE_USER_ROLE: &str = "UPDATE users SET role = ? WHERE id = ?";

/// Replace an account's credential record
///
/// **Parameters:**
/// 1. `password_hash: &str` - New serialized credential record
/// 2. `user_id: i64` - User ID
pub const SQL_UPDATE_USER_PASSWORD: &str = "UPDATE users SET password_hash = ? WHERE id = ?";

/// Delete a user row
///
/// **Parameters:**
/// 1. `user_id: i64` - User ID
///
/// **Note:** Dependent chats and messages must already be gone; the
/// cascade is performed explicitly, child-then-parent, in one transaction.
pub const SQL_DELETE_USER: &str = "DELETE FROM users WHERE id = ?";

/// Delete all chats owned by a user
///
/// **Parameters:**
/// 1. `user_id: i64` - Owning user ID
pub const SQL_DELETE_CHATS_FOR_USER: &str = "DELETE FROM chats WHERE user_id = ?";

/// Delete all messages in all chats owned by a user
///
/// **Parameters:**
/// 1. `user_id: i64` - Owning user ID
pub const SQL_DELETE_MESSAGES_FOR_USER: &str =
    "DELETE FROM chat_message WHERE chat_id IN (SELECT id FROM chats WHERE user_id = ?)";

// ========================================================================
// Chat Query Operations
// ========================================================================

/// Insert a new chat
///
/// **Parameters:**
/// 1. `user_id: i64` - Owning user ID
/// 2. `title: &str` - Chat title
/// 3. `created_at: &str` - RFC 3339 timestamp
///
/// **Returns:** `last_insert_rowid()` - The new chat's ID
///
/// **Note:** An unknown `user_id` violates the foreign key and is mapped
/// to a not-found error by the caller.
pub const SQL_INSERT_CHAT: &str =
    "INSERT INTO chats (user_id, title, created_at) VALUES (?, ?, ?)";

/// Select chat metadata for a user's sidebar listing
///
/// **Parameters:**
/// 1. `user_id: i64` - Owning user ID
///
/// **Returns:** Multiple rows of `(id, title, last_msg, created_at)` in
/// creation order.
pub const SQL_SELECT_CHATS_FOR_USER: &str =
    "SELECT id, title, last_msg, created_at FROM chats WHERE user_id = ? ORDER BY id";

/// Check whether a chat exists
///
/// **Parameters:**
/// 1. `chat_id: i64` - Chat ID to check
///
/// **Returns:** `(count: i64)` - 1 if the chat exists, 0 if not
pub const SQL_CHAT_EXISTS: &str = "SELECT COUNT(*) FROM chats WHERE id = ?";

/// Update the chat's last-message preview
///
/// **Parameters:**
/// 1. `last_msg: &str` - Content of the most recent message
/// 2. `chat_id: i64` - Chat ID
pub const SQL_UPDATE_CHAT_LAST_MSG: &str = "UPDATE chats SET last_msg = ? WHERE id = ?";

/// Insert a chat message
///
/// **Parameters:**
/// 1. `chat_id: i64` - Owning chat ID
/// 2. `sender: &str` - "user" or "bot"
/// 3. `content: &str` - Message text
/// 4. `timestamp: i64` - Unix epoch milliseconds
///
/// **Returns:** `last_insert_rowid()` - The new message's ID
///
/// **Note:** Messages are immutable; there is no UPDATE statement for
/// this table.
pub const SQL_INSERT_MESSAGE: &str =
    "INSERT INTO chat_message (chat_id, sender, content, timestamp) VALUES (?, ?, ?, ?)";

/// Select all messages of a chat in insertion order
///
/// **Parameters:**
/// 1. `chat_id: i64` - Owning chat ID
///
/// **Returns:** Multiple rows of `(sender, content, timestamp)`
pub const SQL_SELECT_MESSAGES_FOR_CHAT: &str =
    "SELECT sender, content, timestamp FROM chat_message WHERE chat_id = ? ORDER BY id";

/// Select all messages across all chats of a user in insertion order
///
/// **Parameters:**
/// 1. `user_id: i64` - Owning user ID
///
/// **Returns:** Multiple rows of `(sender, content, timestamp)`
pub const SQL_SELECT_MESSAGES_FOR_USER: &str = "
    SELECT m.sender, m.content, m.timestamp
    FROM chat_message m
    JOIN chats c ON m.chat_id = c.id
    WHERE c.user_id = ?
    ORDER BY m.id";

/// Delete all messages of a chat
///
/// **Parameters:**
/// 1. `chat_id: i64` - Owning chat ID
pub const SQL_DELETE_MESSAGES_FOR_CHAT: &str = "DELETE FROM chat_message WHERE chat_id = ?";

/// Delete a chat row
///
/// **Parameters:**
/// 1. `chat_id: i64` - Chat ID
pub const SQL_DELETE_CHAT: &str = "DELETE FROM chats WHERE id = ?";

/// Count messages in a chat
///
/// **Parameters:**
/// 1. `chat_id: i64` - Chat ID
///
/// **Returns:** `(count: i64)`
///
/// Note: Only used in tests to assert cascade behavior.
#[cfg(test)]
pub const SQL_COUNT_MESSAGES_FOR_CHAT: &str =
    "SELECT COUNT(*) FROM chat_message WHERE chat_id = ?";

// ========================================================================
// Document Query Operations
// ========================================================================

/// Insert a new document
///
/// **Parameters:**
/// 1. `name: &str` - File name (basename of the path)
/// 2. `extension: &str` - File extension including the leading dot
/// 3. `path: &str` - Storage path resolvable by the blob layer
/// 4. `description: &str` - Summary used as LLM context
/// 5. `vectorized: bool` - Whether embeddings were already upserted
/// 6. `uploaded_at: &str` - RFC 3339 timestamp
///
/// **Returns:** `last_insert_rowid()` - The new document's ID
pub const SQL_INSERT_DOCUMENT: &str = "INSERT INTO documents (name, extension, path, description, vectorized, uploaded_at) VALUES (?, ?, ?, ?, ?, ?)";

/// Select a document's storage path
///
/// **Parameters:**
/// 1. `document_id: i64` - Document ID
///
/// **Returns:** `(path: String)`
pub const SQL_SELECT_DOCUMENT_PATH: &str = "SELECT path FROM documents WHERE id = ?";

/// Mark a document as vectorized
///
/// **Parameters:**
/// 1. `document_id: i64` - Document ID
pub const SQL_MARK_DOCUMENT_VECTORIZED: &str = "UPDATE documents SET vectorized = 1 WHERE id = ?";

/// Select all document descriptions in insertion order
///
/// **Parameters:** None
///
/// **Returns:** Multiple rows of `(description: String)`
///
/// **Note:** Feeds the numbered "Document N:" context block; ordering by
/// id keeps the numbering stable across calls.
pub const SQL_SELECT_DOC_DESCRIPTIONS: &str = "SELECT description FROM documents ORDER BY id";

/// Delete a document row
///
/// **Parameters:**
/// 1. `document_id: i64` - Document ID
pub const SQL_DELETE_DOCUMENT: &str = "DELETE FROM documents WHERE id = ?";

// ========================================================================
// Image Query Operations
// ========================================================================

/// Insert an extracted image
///
/// **Parameters:**
/// 1. `document_id: i64` - Owning document ID
/// 2. `name: &str` - Image file name
/// 3. `extension: &str` - File extension including the leading dot
/// 4. `path: &str` - Storage path
/// 5. `description: &str` - Caption/context used for retrieval
/// 6. `page_no: i64` - Page the image was extracted from
/// 7. `timestamp: &str` - RFC 3339 timestamp
///
/// **Returns:** `last_insert_rowid()` - The new image's ID
///
/// **Note:** An unknown `document_id` violates the foreign key and is
/// mapped to a not-found error by the caller; no row is persisted.
pub const SQL_INSERT_IMAGE: &str = "INSERT INTO images (document_id, name, extension, path, description, page_no, timestamp) VALUES (?, ?, ?, ?, ?, ?, ?)";

/// Select an image's storage path
///
/// **Parameters:**
/// 1. `image_id: i64` - Image ID
///
/// **Returns:** `(path: String)`
pub const SQL_SELECT_IMAGE_PATH: &str = "SELECT path FROM images WHERE id = ?";

/// Select all image descriptions keyed by image ID
///
/// **Parameters:** None
///
/// **Returns:** Multiple rows of `(id, description)`
pub const SQL_SELECT_IMAGE_DESCRIPTIONS: &str = "SELECT id, description FROM images ORDER BY id";

/// Delete all images of a document
///
/// **Parameters:**
/// 1. `document_id: i64` - Owning document ID
pub const SQL_DELETE_IMAGES_FOR_DOCUMENT: &str = "DELETE FROM images WHERE document_id = ?";

/// Count images of a document
///
/// **Parameters:**
/// 1. `document_id: i64` - Document ID
///
/// **Returns:** `(count: i64)`
///
/// Note: Only used in tests to assert cascade behavior.
#[cfg(test)]
pub const SQL_COUNT_IMAGES_FOR_DOCUMENT: &str =
    "SELECT COUNT(*) FROM images WHERE document_id = ?";
