//! PostgreSQL implementation of the store traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use taskly_models::{
    NewSession, NewTask, NewUser, Session, Task, TaskId, TaskStatus, User, UserId,
    UserWithPassword,
};

use crate::store::{SessionStore, StoreError, TaskStore, UserStore};

const USER_COLUMNS: &str = "id, username, email, created_at, updated_at";
const SESSION_COLUMNS: &str = "id, token, user_id, expires_at, created_at";
const TASK_COLUMNS: &str = "id, title, status, user_id, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_with_password_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, StoreError> {
        let user = sqlx::query_as::<_, UserWithPassword>(
            r#"SELECT id, username, email, password_hash, created_at, updated_at
               FROM users
               WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn username_or_email_taken(
        &self,
        username: &str,
        email: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, StoreError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                   SELECT 1 FROM users
                   WHERE (username = $1 OR email = $2)
                     AND ($3::BIGINT IS NULL OR id <> $3)
               )"#,
        )
        .bind(username)
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (username, email, password_hash)
               VALUES ($1, $2, $3)
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_user(
        &self,
        id: UserId,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET username = $2, email = $3, updated_at = NOW()
               WHERE id = $1
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(id)
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert_session(&self, session: NewSession) -> Result<Session, StoreError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            r#"INSERT INTO sessions (token, user_id, expires_at, created_at)
               VALUES ($1, $2, $3, $4)
               RETURNING {SESSION_COLUMNS}"#
        ))
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn delete_session(&self, token: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(
        &self,
        owner: UserId,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"SELECT {TASK_COLUMNS} FROM tasks
               WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
               ORDER BY id"#
        ))
        .bind(owner)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"INSERT INTO tasks (title, status, user_id)
               VALUES ($1, $2, $3)
               RETURNING {TASK_COLUMNS}"#
        ))
        .bind(&task.title)
        .bind(task.status)
        .bind(task.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"UPDATE tasks
               SET title = $2, status = $3, updated_at = NOW()
               WHERE id = $1
               RETURNING {TASK_COLUMNS}"#
        ))
        .bind(id)
        .bind(title)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
