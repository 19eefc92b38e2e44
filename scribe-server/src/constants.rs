//! Server constants
//!
//! Pool limits and user-facing message strings for the `scribed` binary.

/// Maximum number of pooled database connections
pub const POOL_MAX_CONNECTIONS: u32 = 10;

/// Seconds to wait for a pooled connection before failing the operation
pub const POOL_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Seconds SQLite waits on a locked database before reporting busy
pub const DB_BUSY_TIMEOUT_SECS: u64 = 5;

// ========================================================================
// Binary messages
// ========================================================================

pub const MSG_BANNER: &str = "Scribe persistence service v";
pub const MSG_DATABASE: &str = "Database: ";
pub const MSG_ADMIN_CREATED: &str = "Created admin account: ";
pub const MSG_USER_COUNT: &str = "Registered accounts: ";

pub const ERR_GENERIC: &str = "Error: ";
pub const ERR_DATABASE_INIT: &str = "Failed to initialize database: ";
pub const ERR_ADMIN_CREATE: &str = "Failed to create admin account: ";
pub const ERR_ADMIN_PASSWORD_REQUIRED: &str = "--create-admin requires --admin-password";
pub const ERR_LIST_USERS: &str = "Failed to list accounts: ";
