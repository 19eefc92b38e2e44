//! Schema creation
//!
//! Idempotent schema for the five relational tables. Foreign keys are
//! declared without `ON DELETE CASCADE`: when an owner is deleted the
//! facade removes dependents explicitly, child-then-parent, inside the
//! same transaction, so the delete path is visible in the code rather
//! than hidden in the schema.

use sqlx::SqlitePool;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        username      TEXT NOT NULL COLLATE NOCASE UNIQUE,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL,
        created_at    TEXT NOT NULL,
        last_login    TEXT,
        is_active     INTEGER NOT NULL DEFAULT 1
    );

    CREATE TABLE IF NOT EXISTS chats (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id    INTEGER NOT NULL REFERENCES users(id),
        title      TEXT,
        last_msg   TEXT,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_chats_user ON chats(user_id);

    CREATE TABLE IF NOT EXISTS chat_message (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        chat_id   INTEGER NOT NULL REFERENCES chats(id),
        sender    TEXT NOT NULL,
        content   TEXT NOT NULL,
        timestamp INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_chat_message_chat ON chat_message(chat_id);

    CREATE TABLE IF NOT EXISTS documents (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        extension   TEXT NOT NULL,
        path        TEXT NOT NULL,
        description TEXT NOT NULL,
        vectorized  INTEGER NOT NULL DEFAULT 0,
        uploaded_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS images (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        document_id INTEGER NOT NULL REFERENCES documents(id),
        name        TEXT NOT NULL,
        extension   TEXT NOT NULL,
        path        TEXT NOT NULL,
        description TEXT NOT NULL,
        page_no     INTEGER NOT NULL,
        timestamp   TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_images_document ON images(document_id);
";

/// Apply the schema to a freshly opened pool
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    tracing::debug!("database schema applied");
    Ok(())
}
