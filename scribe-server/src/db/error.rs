//! Typed error taxonomy for the persistence facade
//!
//! Every fault from the database layer is converted to one of these kinds
//! before it crosses the `db` boundary, so callers never see a raw driver
//! error and can always tell absence, rejection, and infrastructure
//! failure apart. The routing layer maps the kinds onto status codes
//! (`NotFound` -> 404, `Denied` -> 401, and so on).

use std::fmt;

/// Outcome kinds for facade operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// A referenced entity does not exist
    NotFound,
    /// Credentials were presented and rejected
    Denied,
    /// An input value is outside its allowed set
    InvalidArgument(String),
    /// Constraint violation or connectivity fault
    Persistence(String),
    /// The connection pool was exhausted or closed
    ResourceExhausted,
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::NotFound => write!(f, "not found"),
            DbError::Denied => write!(f, "denied"),
            DbError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            DbError::Persistence(msg) => write!(f, "persistence error: {}", msg),
            DbError::ResourceExhausted => write!(f, "resource exhausted"),
        }
    }
}

impl std::error::Error for DbError {}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => DbError::ResourceExhausted,
            other => DbError::Persistence(other.to_string()),
        }
    }
}

/// Convert a driver fault into a typed error, logging it with its
/// operation tag. Used on every facade exit path that isn't a plain
/// absence or credential rejection.
pub(crate) fn fault(op: &'static str, err: sqlx::Error) -> DbError {
    let err = DbError::from(err);
    match err {
        DbError::NotFound => tracing::debug!(op, "row not found"),
        _ => tracing::error!(op, error = %err, "database operation failed"),
    }
    err
}

/// Like [`fault`], but maps a foreign-key violation to `NotFound`.
///
/// Inserts that reference an owner row lean on the foreign-key constraint
/// instead of a prior existence check, so the violation is the signal
/// that the referenced entity is missing.
pub(crate) fn fault_missing_ref(op: &'static str, err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(ref dbe) = err
        && matches!(dbe.kind(), sqlx::error::ErrorKind::ForeignKeyViolation)
    {
        tracing::debug!(op, "referenced row does not exist");
        return DbError::NotFound;
    }
    fault(op, err)
}
