//! In-memory store for tests.
//!
//! Mirrors the constraints the PostgreSQL schema enforces: unique
//! username, email and token, foreign keys to `users`, and cascading
//! deletes from a user to its tasks and sessions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use taskly_models::{
    NewSession, NewTask, NewUser, Session, SessionId, Task, TaskId, TaskStatus, User, UserId,
    UserWithPassword,
};
use tokio::sync::Mutex;

use crate::store::{SessionStore, StoreError, TaskStore, UserStore};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, UserWithPassword>,
    sessions: BTreeMap<SessionId, Session>,
    tasks: BTreeMap<TaskId, Task>,
    next_user_id: i64,
    next_session_id: i64,
    next_task_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn session_count(&self) -> usize {
        self.tables.lock().await.sessions.len()
    }

    /// Moves the expiry of the session identified by `token`.
    pub async fn set_session_expiry(&self, token: &str, expires_at: DateTime<Utc>) -> bool {
        let mut tables = self.tables.lock().await;
        match tables.sessions.values_mut().find(|s| s.token == token) {
            Some(session) => {
                session.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().cloned().map(UserWithPassword::into_user).collect())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).cloned().map(UserWithPassword::into_user))
    }

    async fn find_user_with_password_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn username_or_email_taken(
        &self,
        username: &str,
        email: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().any(|u| {
            Some(u.id) != exclude && (u.username == username || u.email == email)
        }))
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation("users_username_key".into()));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".into()));
        }

        let id = UserId(Tables::next_id(&mut tables.next_user_id));
        let now = Utc::now();
        let row = UserWithPassword {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, row.clone());
        Ok(row.into_user())
    }

    async fn update_user(
        &self,
        id: UserId,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables
            .users
            .values()
            .any(|u| u.id != id && (u.username == username || u.email == email))
        {
            return Err(StoreError::UniqueViolation("users_username_or_email".into()));
        }

        let Some(row) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        row.username = username.to_string();
        row.email = email.to_string();
        row.updated_at = Utc::now();
        Ok(Some(row.clone().into_user()))
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.tasks.retain(|_, t| t.user_id != id);
        tables.sessions.retain(|_, s| s.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(&self, session: NewSession) -> Result<Session, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&session.user_id) {
            return Err(StoreError::ForeignKeyViolation("sessions_user_id_fkey".into()));
        }
        if tables.sessions.values().any(|s| s.token == session.token) {
            return Err(StoreError::UniqueViolation("sessions_token_key".into()));
        }

        let id = SessionId(Tables::next_id(&mut tables.next_session_id));
        let row = Session {
            id,
            token: session.token,
            user_id: session.user_id,
            expires_at: session.expires_at,
            created_at: session.created_at,
        };
        tables.sessions.insert(id, row.clone());
        Ok(row)
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.sessions.values().find(|s| s.token == token).cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| s.token != token);
        Ok(tables.sessions.len() < before)
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(
        &self,
        owner: UserId,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.user_id == owner && status.is_none_or(|s| t.status == s))
            .cloned()
            .collect())
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.tasks.get(&id).cloned())
    }

    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&task.user_id) {
            return Err(StoreError::ForeignKeyViolation("tasks_user_id_fkey".into()));
        }

        let id = TaskId(Tables::next_id(&mut tables.next_task_id));
        let now = Utc::now();
        let row = Task {
            id,
            title: task.title,
            status: task.status,
            user_id: task.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(id, row.clone());
        Ok(row)
    }

    async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.tasks.get_mut(&id).map(|task| {
            task.title = title.to_string();
            task.status = status;
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: None,
        }
    }

    #[tokio::test]
    async fn test_insert_user_enforces_uniqueness() {
        let store = MemoryStore::new();
        store.insert_user(new_user("alice", "alice@x.com")).await.unwrap();

        let dup_name = store.insert_user(new_user("alice", "other@x.com")).await;
        assert!(dup_name.unwrap_err().is_unique_violation());

        let dup_email = store.insert_user(new_user("bob", "alice@x.com")).await;
        assert!(dup_email.unwrap_err().is_unique_violation());
    }

    #[tokio::test]
    async fn test_taken_check_excludes_self() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "alice@x.com")).await.unwrap();

        assert!(store.username_or_email_taken("alice", "new@x.com", None).await.unwrap());
        assert!(
            !store
                .username_or_email_taken("alice", "alice@x.com", Some(alice.id))
                .await
                .unwrap()
        );
        assert!(!store.username_or_email_taken("ALICE", "ALICE@x.com", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "alice@x.com")).await.unwrap();
        let bob = store.insert_user(new_user("bob", "bob@x.com")).await.unwrap();
        let now = Utc::now();

        for (user, token) in [(alice.id, "a"), (bob.id, "b")] {
            store
                .insert_session(NewSession {
                    token: token.into(),
                    user_id: user,
                    expires_at: now + TimeDelta::hours(1),
                    created_at: now,
                })
                .await
                .unwrap();
            store
                .insert_task(NewTask {
                    title: "Buy milk".into(),
                    status: TaskStatus::ToDo,
                    user_id: user,
                })
                .await
                .unwrap();
        }

        assert!(store.delete_user(alice.id).await.unwrap());
        assert!(store.find_session("a").await.unwrap().is_none());
        assert!(store.find_session("b").await.unwrap().is_some());
        assert!(store.list_tasks(alice.id, None).await.unwrap().is_empty());
        assert_eq!(store.list_tasks(bob.id, None).await.unwrap().len(), 1);
        assert!(!store.delete_user(alice.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_task_requires_existing_user() {
        let store = MemoryStore::new();
        let err = store
            .insert_task(NewTask {
                title: "Orphan".into(),
                status: TaskStatus::Done,
                user_id: UserId(99),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn test_list_tasks_filters_by_owner_and_status() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "alice@x.com")).await.unwrap();
        for status in TaskStatus::ALL {
            store
                .insert_task(NewTask {
                    title: format!("Task {status}"),
                    status,
                    user_id: alice.id,
                })
                .await
                .unwrap();
        }

        let done = store.list_tasks(alice.id, Some(TaskStatus::Done)).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].status, TaskStatus::Done);
        assert_eq!(store.list_tasks(alice.id, None).await.unwrap().len(), 3);
        assert!(store.list_tasks(UserId(42), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_expired_sessions() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "alice@x.com")).await.unwrap();
        let now = Utc::now();

        for (token, offset) in [("old", -1), ("edge", 0), ("fresh", 1)] {
            store
                .insert_session(NewSession {
                    token: token.into(),
                    user_id: alice.id,
                    expires_at: now + TimeDelta::hours(offset),
                    created_at: now - TimeDelta::hours(24),
                })
                .await
                .unwrap();
        }

        assert_eq!(store.delete_expired_sessions(now).await.unwrap(), 2);
        assert_eq!(store.session_count().await, 1);
        assert!(store.find_session("fresh").await.unwrap().is_some());
    }
}
