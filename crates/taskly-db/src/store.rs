//! Storage traits.
//!
//! Services receive these as `Arc<dyn ...>` through the application state,
//! so the same handlers run against PostgreSQL in production and against
//! the in-memory store in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use taskly_models::{
    NewSession, NewTask, NewUser, Session, Task, TaskId, TaskStatus, User, UserId,
    UserWithPassword,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name
    /// when the backend reports one.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row (usually the owning user) does not exist.
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

/// Credential store: user accounts and their password hashes.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Exact, case-sensitive match on email.
    async fn find_user_with_password_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, StoreError>;

    /// True when another account already uses `username` or `email`.
    /// `exclude` skips the account being updated.
    async fn username_or_email_taken(
        &self,
        username: &str,
        email: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, StoreError>;

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Returns `None` when no user has this id.
    async fn update_user(
        &self,
        id: UserId,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Deletes the user together with its tasks and sessions. Returns false
    /// when no user has this id.
    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError>;
}

/// Session store, keyed by token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, session: NewSession) -> Result<Session, StoreError>;

    /// Exact token match. Expired rows are returned as well; the caller
    /// decides what to do with them.
    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError>;

    async fn delete_session(&self, token: &str) -> Result<bool, StoreError>;

    /// Removes every session with `expires_at <= now`, returning how many
    /// were deleted.
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks owned by `owner`, oldest first, optionally filtered by status.
    async fn list_tasks(
        &self,
        owner: UserId,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, StoreError>;

    async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Overwrites title and status in one statement. Returns `None` when
    /// the task no longer exists.
    async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError>;

    async fn delete_task(&self, id: TaskId) -> Result<bool, StoreError>;
}
