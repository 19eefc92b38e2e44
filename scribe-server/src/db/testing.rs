//! Test helpers for database modules

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Create an in-memory database pool with the schema applied
///
/// Pinned to a single connection that never expires: an in-memory SQLite
/// database lives and dies with its connection.
pub async fn create_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("failed to open in-memory database");

    super::migrations::run(&pool)
        .await
        .expect("failed to apply schema");

    pool
}
