//! Database layer
//!
//! The only part of the service that touches SQLite. One bounded
//! connection pool is opened at startup; every facade operation acquires
//! exactly one connection or transaction for its duration and releases it
//! on all exit paths. Waiting for a pooled connection is experienced by
//! callers as latency, up to the acquire timeout, after which the
//! operation fails as `ResourceExhausted`.

pub mod chats;
pub mod documents;
pub mod error;
pub mod history;
pub mod migrations;
pub mod password;
pub mod sql;
pub mod users;

#[cfg(test)]
pub mod testing;

pub use chats::ChatDb;
pub use documents::DocumentDb;
pub use error::DbError;
pub use history::HistoryRequest;
pub use users::UserDb;

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::constants::{DB_BUSY_TIMEOUT_SECS, POOL_ACQUIRE_TIMEOUT_SECS, POOL_MAX_CONNECTIONS};

/// Database access for all entity types
///
/// Bundles the per-entity repositories over one shared pool.
/// `SqlitePool` uses `Arc` internally, so `clone()` is cheap.
#[derive(Clone)]
pub struct Database {
    pub users: UserDb,
    pub chats: ChatDb,
    pub documents: DocumentDb,
}

impl Database {
    /// Create a new Database instance over an initialized pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserDb::new(pool.clone()),
            chats: ChatDb::new(pool.clone()),
            documents: DocumentDb::new(pool),
        }
    }
}

/// Determine the platform default database path
///
/// Creates the data directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error message if no platform data directory is available or
/// the directory can't be created.
pub fn default_database_path() -> Result<PathBuf, String> {
    let data_dir = dirs::data_dir().ok_or("could not determine platform data directory")?;
    let scribe_dir = data_dir.join("scribed");
    std::fs::create_dir_all(&scribe_dir)
        .map_err(|e| format!("could not create {}: {}", scribe_dir.display(), e))?;
    Ok(scribe_dir.join("scribe.db"))
}

/// Initialize the database connection pool and apply the schema
///
/// WAL journaling for concurrent readers, foreign keys enforced, bounded
/// pool with an acquire timeout so exhaustion surfaces as a typed error
/// instead of an indefinite wait.
pub async fn init_db(path: &Path) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(DB_BUSY_TIMEOUT_SECS))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(POOL_MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(POOL_ACQUIRE_TIMEOUT_SECS))
        .connect_with(options)
        .await
        .map_err(|e| error::fault("init_db", e))?;

    migrations::run(&pool)
        .await
        .map_err(|e| error::fault("init_db", e))?;

    Ok(pool)
}
