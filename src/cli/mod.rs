//! Administrative operations behind the `taskly-cli` binary.

use chrono::{DateTime, Utc};
use taskly_core::validate_request;
use taskly_db::{SessionStore, UserStore};
use taskly_models::{CreateUserDto, User};

use crate::modules::users::service::UserService;

/// Creates an account with the same rules as `POST /users`.
pub async fn create_user(
    users: &dyn UserStore,
    username: &str,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<User> {
    let dto = CreateUserDto {
        username: username.to_string(),
        email: email.to_string(),
        password,
    };
    validate_request(&dto).map_err(|err| anyhow::anyhow!(err.public_message()))?;

    UserService::create_user(users, dto)
        .await
        .map_err(|err| anyhow::anyhow!(err.public_message()))
}

/// Deletes every session that expired at or before `now`.
pub async fn purge_expired_sessions(
    sessions: &dyn SessionStore,
    now: DateTime<Utc>,
) -> anyhow::Result<u64> {
    Ok(sessions.delete_expired_sessions(now).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use taskly_auth::SessionPolicy;
    use taskly_db::MemoryStore;

    #[tokio::test]
    async fn test_create_user_validates_input() {
        let store = MemoryStore::new();
        let err = create_user(&store, "x", "bad", None).await.unwrap_err();
        assert!(err.to_string().contains("Username"));

        let user = create_user(&store, "admin", "admin@x.com", Some("Passw0rd!".into()))
            .await
            .unwrap();
        assert_eq!(user.username, "admin");

        let err = create_user(&store, "admin", "admin@x.com", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Username or email already exists");
    }

    #[tokio::test]
    async fn test_purge_expired_sessions() {
        let store = MemoryStore::new();
        let user = create_user(&store, "admin", "admin@x.com", None).await.unwrap();
        let policy = SessionPolicy::new(TimeDelta::hours(1));
        let now = Utc::now();

        store
            .insert_session(policy.issue(user.id, now - TimeDelta::hours(2)))
            .await
            .unwrap();
        store.insert_session(policy.issue(user.id, now)).await.unwrap();

        assert_eq!(purge_expired_sessions(&store, now).await.unwrap(), 1);
        assert_eq!(store.session_count().await, 1);
    }
}
