//! User account database operations
//!
//! Account creation, credential checks, activation state, role and
//! password changes, summaries, and the cross-chat conversation snapshot.
//! Authentication only ever sees active accounts: a deactivated user with
//! the right password still reads as "no such user".

use chrono::{Local, Utc};
use scribe_common::validators::{self, PasswordError, UsernameError};
use scribe_common::{AuthInfo, ConversationView, Role, UserSummary};
use sqlx::SqlitePool;

use super::error::{self, DbError};
use super::history::{self, HistoryRequest};
use super::{chats, password, sql};

/// A user account from the database
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
    pub last_login: Option<String>,
    pub is_active: bool,
}

/// Row type for user queries
type UserRow = (i64, String, String, String, String, Option<String>, bool);

/// Row type for the summary listing with chat counts
type SummaryRow = (i64, String, String, String, Option<String>, bool, i64);

fn record_from_row(row: UserRow) -> Result<UserRecord, DbError> {
    let role = Role::parse(&row.3).ok_or_else(|| {
        DbError::Persistence(format!("unknown role '{}' in users row {}", row.3, row.0))
    })?;
    Ok(UserRecord {
        id: row.0,
        username: row.1,
        password_hash: row.2,
        role,
        created_at: row.4,
        last_login: row.5,
        is_active: row.6,
    })
}

fn summary_from_row(row: SummaryRow) -> Result<UserSummary, DbError> {
    let role = Role::parse(&row.2).ok_or_else(|| {
        DbError::Persistence(format!("unknown role '{}' in users row {}", row.2, row.0))
    })?;
    Ok(UserSummary {
        user_id: row.0,
        username: row.1,
        role,
        created_at: row.3,
        last_login: row.4,
        is_active: row.5,
        chat_count: row.6,
    })
}

fn username_error(err: UsernameError) -> DbError {
    let msg = match err {
        UsernameError::Empty => "username cannot be empty",
        UsernameError::TooLong => "username is too long",
        UsernameError::InvalidCharacters => "username contains invalid characters",
    };
    DbError::InvalidArgument(msg.to_string())
}

fn password_error(err: PasswordError) -> DbError {
    let msg = match err {
        PasswordError::Empty => "password cannot be empty",
        PasswordError::TooLong => "password is too long",
    };
    DbError::InvalidArgument(msg.to_string())
}

/// Local login time plus GMT offset, the format the account pages display
fn login_timestamp() -> String {
    let now = Local::now();
    let offset_secs = now.offset().local_minus_utc();
    let hours = offset_secs / 3600;
    let minutes = (offset_secs.abs() % 3600) / 60;
    format!(
        "{} GMT{:+03}:{:02}",
        now.format("%Y-%m-%d %H:%M:%S"),
        hours,
        minutes
    )
}

/// Database interface for user accounts
#[derive(Clone)]
pub struct UserDb {
    pool: SqlitePool,
}

impl UserDb {
    /// Create a new UserDb instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user account
    ///
    /// Returns the new user's ID. The username must be unique
    /// (case-insensitive); a duplicate surfaces as a persistence error.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a bad username, password, or role;
    /// `Persistence` on constraint violation or connectivity fault.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, DbError> {
        const OP: &str = "create_user";

        validators::validate_username(username).map_err(username_error)?;
        let role = Role::parse(role)
            .ok_or_else(|| DbError::InvalidArgument(format!("unknown role '{}'", role)))?;
        let password_hash = password::hash_password(password, false).map_err(password_error)?;
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(sql::SQL_INSERT_USER)
            .bind(username)
            .bind(&password_hash)
            .bind(role.as_str())
            .bind(&created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| error::fault(OP, e))?;

        let user_id = result.last_insert_rowid();
        tracing::debug!(op = OP, user_id, "user created");
        Ok(user_id)
    }

    /// Authenticate a username/password pair
    ///
    /// On success the login time is recorded in the same transaction and
    /// the user's ID and role are returned.
    ///
    /// # Errors
    ///
    /// `NotFound` if no active account matches the username;
    /// `Denied` if the password does not verify.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthInfo, DbError> {
        const OP: &str = "authenticate";

        let mut tx = self.pool.begin().await.map_err(|e| error::fault(OP, e))?;

        let row: Option<UserRow> = sqlx::query_as(sql::SQL_SELECT_ACTIVE_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        let Some(row) = row else {
            tracing::debug!(op = OP, username, "no active account");
            return Err(DbError::NotFound);
        };
        let user = record_from_row(row)?;

        if !password::verify_password(password, &user.password_hash) {
            tracing::debug!(op = OP, user_id = user.id, "password rejected");
            return Err(DbError::Denied);
        }

        sqlx::query(sql::SQL_UPDATE_LAST_LOGIN)
            .bind(login_timestamp())
            .bind(user.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        tx.commit().await.map_err(|e| error::fault(OP, e))?;

        tracing::debug!(op = OP, user_id = user.id, "authentication successful");
        Ok(AuthInfo {
            user_id: user.id,
            role: user.role,
        })
    }

    /// Get a user's summary, including the owned-chat count
    pub async fn get_user_info(&self, user_id: i64) -> Result<UserSummary, DbError> {
        const OP: &str = "get_user_info";

        let mut tx = self.pool.begin().await.map_err(|e| error::fault(OP, e))?;

        let row: Option<UserRow> = sqlx::query_as(sql::SQL_SELECT_USER_BY_ID)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        let Some(row) = row else {
            tracing::debug!(op = OP, user_id, "user does not exist");
            return Err(DbError::NotFound);
        };
        let user = record_from_row(row)?;

        let chat_count: i64 = sqlx::query_scalar(sql::SQL_COUNT_CHATS_FOR_USER)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        tx.commit().await.map_err(|e| error::fault(OP, e))?;

        Ok(UserSummary {
            user_id: user.id,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
            last_login: user.last_login,
            is_active: user.is_active,
            chat_count,
        })
    }

    /// Get summaries for every account, sorted by username
    pub async fn get_all_users_info(&self) -> Result<Vec<UserSummary>, DbError> {
        const OP: &str = "get_all_users_info";

        let rows: Vec<SummaryRow> = sqlx::query_as(sql::SQL_SELECT_USER_SUMMARIES)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| error::fault(OP, e))?;

        rows.into_iter().map(summary_from_row).collect()
    }

    /// Disable an account
    ///
    /// Deactivated accounts cannot authenticate. Deactivating an already
    /// inactive account is a no-op success.
    pub async fn deactivate_user(&self, user_id: i64) -> Result<(), DbError> {
        self.set_active(user_id, false, "deactivate_user").await
    }

    /// Re-enable an account
    ///
    /// Activating an already active account is a no-op success.
    pub async fn activate_user(&self, user_id: i64) -> Result<(), DbError> {
        self.set_active(user_id, true, "activate_user").await
    }

    async fn set_active(
        &self,
        user_id: i64,
        active: bool,
        op: &'static str,
    ) -> Result<(), DbError> {
        let result = sqlx::query(sql::SQL_SET_USER_ACTIVE)
            .bind(active)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| error::fault(op, e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(op, user_id, "user does not exist");
            return Err(DbError::NotFound);
        }
        tracing::debug!(op, user_id, active, "account state updated");
        Ok(())
    }

    /// Change an account's role
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a role outside {admin, user};
    /// `NotFound` for an unknown user.
    pub async fn change_role(&self, user_id: i64, role: &str) -> Result<(), DbError> {
        const OP: &str = "change_role";

        let role = Role::parse(role)
            .ok_or_else(|| DbError::InvalidArgument(format!("unknown role '{}'", role)))?;

        let result = sqlx::query(sql::SQL_UPDATE_USER_ROLE)
            .bind(role.as_str())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| error::fault(OP, e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(op = OP, user_id, "user does not exist");
            return Err(DbError::NotFound);
        }
        tracing::debug!(op = OP, user_id, role = role.as_str(), "role changed");
        Ok(())
    }

    /// Replace an account's password
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty or oversized password;
    /// `NotFound` for an unknown user.
    pub async fn change_password(&self, user_id: i64, password: &str) -> Result<(), DbError> {
        const OP: &str = "change_password";

        let password_hash = password::hash_password(password, false).map_err(password_error)?;

        let result = sqlx::query(sql::SQL_UPDATE_USER_PASSWORD)
            .bind(&password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| error::fault(OP, e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(op = OP, user_id, "user does not exist");
            return Err(DbError::NotFound);
        }
        tracing::debug!(op = OP, user_id, "password changed");
        Ok(())
    }

    /// Build a conversation view across all chats a user owns
    ///
    /// Messages from every owned chat are merged in insertion order
    /// before the transcript/sort views are built.
    pub async fn get_user_conversation(
        &self,
        user_id: i64,
        request: HistoryRequest,
    ) -> Result<ConversationView, DbError> {
        const OP: &str = "get_user_conversation";

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

        let rows: Vec<(String, String, i64)> = sqlx::query_as(sql::SQL_SELECT_MESSAGES_FOR_USER)
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        tx.commit().await.map_err(|e| error::fault(OP, e))?;

        let messages = rows
            .into_iter()
            .map(chats::message_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history::build_view(&messages, request))
    }

    /// Delete an account and everything it owns
    ///
    /// Messages, then chats, then the user row, all inside one
    /// transaction. The routing layer normally only deactivates accounts;
    /// this is the explicit cascade for actual removal.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), DbError> {
        const OP: &str = "delete_user";

        let mut tx = self.pool.begin().await.map_err(|e| error::fault(OP, e))?;

        sqlx::query(sql::SQL_DELETE_MESSAGES_FOR_USER)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        sqlx::query(sql::SQL_DELETE_CHATS_FOR_USER)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        let result = sqlx::query(sql::SQL_DELETE_USER)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::fault(OP, e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(op = OP, user_id, "user does not exist");
            return Err(DbError::NotFound);
        }

        tx.commit().await.map_err(|e| error::fault(OP, e))?;

        tracing::debug!(op = OP, user_id, "user deleted");
        Ok(())
    }

    /// Count all accounts
    pub async fn count_users(&self) -> Result<i64, DbError> {
        sqlx::query_scalar(sql::SQL_COUNT_USERS)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| error::fault("count_users", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ChatDb;
    use crate::db::testing::create_test_db;
    use scribe_common::Sender;

    #[tokio::test]
    async fn test_create_user_and_authenticate() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        let user_id = users.create_user("alice", "pw123", "user").await.unwrap();

        let info = users.authenticate("alice", "pw123").await.unwrap();
        assert_eq!(info.user_id, user_id);
        assert_eq!(info.role, Role::User);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_denied() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        users.create_user("alice", "pw123", "user").await.unwrap();

        let err = users.authenticate("alice", "wrong").await.unwrap_err();
        assert_eq!(err, DbError::Denied);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user_not_found() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        let err = users.authenticate("ghost", "pw").await.unwrap_err();
        assert_eq!(err, DbError::NotFound);
    }

    #[tokio::test]
    async fn test_authenticate_case_insensitive_username() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        users.create_user("Alice", "pw123", "user").await.unwrap();

        assert!(users.authenticate("alice", "pw123").await.is_ok());
        assert!(users.authenticate("ALICE", "pw123").await.is_ok());
    }

    #[tokio::test]
    async fn test_deactivated_user_cannot_authenticate() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        let user_id = users.create_user("alice", "pw123", "user").await.unwrap();
        users.deactivate_user(user_id).await.unwrap();

        // Correct password, but the account is disabled
        let err = users.authenticate("alice", "pw123").await.unwrap_err();
        assert_eq!(err, DbError::NotFound);

        // Reactivation restores access
        users.activate_user(user_id).await.unwrap();
        assert!(users.authenticate("alice", "pw123").await.is_ok());
    }

    #[tokio::test]
    async fn test_activation_is_idempotent() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        let user_id = users.create_user("alice", "pw123", "user").await.unwrap();

        users.deactivate_user(user_id).await.unwrap();
        users.deactivate_user(user_id).await.unwrap();
        users.activate_user(user_id).await.unwrap();
        users.activate_user(user_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_activation_unknown_user_not_found() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        assert_eq!(
            users.deactivate_user(99999).await.unwrap_err(),
            DbError::NotFound
        );
        assert_eq!(
            users.activate_user(99999).await.unwrap_err(),
            DbError::NotFound
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_is_persistence_error() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        users.create_user("alice", "pw123", "user").await.unwrap();

        let err = users.create_user("alice", "other", "user").await.unwrap_err();
        assert!(matches!(err, DbError::Persistence(_)));

        // Case-insensitive collation catches case variants too
        let err = users.create_user("ALICE", "other", "user").await.unwrap_err();
        assert!(matches!(err, DbError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        let err = users.create_user("", "pw123", "user").await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));

        let err = users.create_user("alice", "", "user").await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));

        let err = users.create_user("alice", "pw123", "root").await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_change_role() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        let user_id = users.create_user("alice", "pw123", "user").await.unwrap();
        users.change_role(user_id, "admin").await.unwrap();

        let info = users.authenticate("alice", "pw123").await.unwrap();
        assert_eq!(info.role, Role::Admin);

        let err = users.change_role(user_id, "superuser").await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));

        let err = users.change_role(99999, "admin").await.unwrap_err();
        assert_eq!(err, DbError::NotFound);
    }

    #[tokio::test]
    async fn test_change_password() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        let user_id = users.create_user("alice", "old-pw", "user").await.unwrap();
        users.change_password(user_id, "new-pw").await.unwrap();

        assert_eq!(
            users.authenticate("alice", "old-pw").await.unwrap_err(),
            DbError::Denied
        );
        assert!(users.authenticate("alice", "new-pw").await.is_ok());

        let err = users.change_password(99999, "pw").await.unwrap_err();
        assert_eq!(err, DbError::NotFound);
    }

    #[tokio::test]
    async fn test_get_user_info() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool.clone());
        let chats = ChatDb::new(pool);

        let user_id = users.create_user("alice", "pw123", "admin").await.unwrap();
        chats.create_chat(user_id, None).await.unwrap();
        chats.create_chat(user_id, Some("Policies")).await.unwrap();

        let summary = users.get_user_info(user_id).await.unwrap();
        assert_eq!(summary.user_id, user_id);
        assert_eq!(summary.username, "alice");
        assert_eq!(summary.role, Role::Admin);
        assert!(summary.is_active);
        assert_eq!(summary.chat_count, 2);
        // Never logged in yet
        assert!(summary.last_login.is_none());

        assert_eq!(
            users.get_user_info(99999).await.unwrap_err(),
            DbError::NotFound
        );
    }

    #[tokio::test]
    async fn test_last_login_recorded_on_authenticate() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        let user_id = users.create_user("alice", "pw123", "user").await.unwrap();
        users.authenticate("alice", "pw123").await.unwrap();

        let summary = users.get_user_info(user_id).await.unwrap();
        let last_login = summary.last_login.unwrap();
        assert!(last_login.contains("GMT"));
    }

    #[tokio::test]
    async fn test_get_all_users_info_sorted_by_username() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        users.create_user("carol", "pw", "user").await.unwrap();
        users.create_user("alice", "pw", "admin").await.unwrap();
        users.create_user("Bob", "pw", "user").await.unwrap();

        let all = users.get_all_users_info().await.unwrap();
        let names: Vec<&str> = all.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "Bob", "carol"]);
    }

    #[tokio::test]
    async fn test_user_conversation_spans_all_chats() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool.clone());
        let chats = ChatDb::new(pool);

        let user_id = users.create_user("alice", "pw123", "user").await.unwrap();
        let chat_a = chats.create_chat(user_id, Some("a")).await.unwrap();
        let chat_b = chats.create_chat(user_id, Some("b")).await.unwrap();

        chats
            .add_message(chat_a.chat_id, "user", "question one")
            .await
            .unwrap();
        chats
            .add_message(chat_b.chat_id, "bot", "answer two")
            .await
            .unwrap();

        let view = users
            .get_user_conversation(user_id, HistoryRequest::default())
            .await
            .unwrap();

        let sorted = view.sorted.unwrap();
        assert_eq!(sorted.len(), 2);
        assert_eq!(sorted[0].sender, Sender::User);
        assert_eq!(sorted[1].sender, Sender::Bot);

        let transcript = view.transcript.unwrap();
        assert_eq!(transcript, "[User]: question one\n\n[LLM]: answer two\n\n");
    }

    #[tokio::test]
    async fn test_user_conversation_unknown_user_not_found() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        let err = users
            .get_user_conversation(99999, HistoryRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, DbError::NotFound);
    }

    #[tokio::test]
    async fn test_delete_user_cascades_chats_and_messages() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool.clone());
        let chats = ChatDb::new(pool.clone());

        let user_id = users.create_user("alice", "pw123", "user").await.unwrap();
        let chat = chats.create_chat(user_id, None).await.unwrap();
        chats
            .add_message(chat.chat_id, "user", "hello")
            .await
            .unwrap();

        users.delete_user(user_id).await.unwrap();

        // Owner, chat, and messages are all gone
        assert_eq!(
            users.get_user_info(user_id).await.unwrap_err(),
            DbError::NotFound
        );
        assert_eq!(chats.count_messages(chat.chat_id).await, 0);
        assert_eq!(
            chats
                .get_chat_messages(chat.chat_id, HistoryRequest::default())
                .await
                .unwrap_err(),
            DbError::NotFound
        );

        // Deleting again reports absence
        assert_eq!(
            users.delete_user(user_id).await.unwrap_err(),
            DbError::NotFound
        );
    }

    #[tokio::test]
    async fn test_count_users() {
        let pool = create_test_db().await;
        let users = UserDb::new(pool);

        assert_eq!(users.count_users().await.unwrap(), 0);
        users.create_user("alice", "pw", "user").await.unwrap();
        users.create_user("bob", "pw", "user").await.unwrap();
        assert_eq!(users.count_users().await.unwrap(), 2);
    }
}
