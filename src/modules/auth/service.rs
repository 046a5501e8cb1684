use anyhow::anyhow;
use chrono::Utc;
use taskly_auth::SessionPolicy;
use taskly_core::{AppError, hash_password, verify_password};
use taskly_db::{SessionStore, UserStore};
use taskly_models::{LoginRequest, NewUser, RegisterRequestDto, Session, User};
use tracing::{info, instrument, warn};

use crate::metrics::{
    track_login_failure, track_login_success, track_session_issued, track_session_revoked,
    track_user_registered,
};
use crate::modules::users::service::{DUPLICATE_USER_MESSAGE, conflict_or_internal};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

fn invalid_credentials(reason: &'static str) -> AppError {
    warn!(reason, "Login failed");
    track_login_failure(reason);
    AppError::unauthorized(INVALID_CREDENTIALS_MESSAGE)
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(users, dto), fields(username = %dto.username))]
    pub async fn register_user(
        users: &dyn UserStore,
        dto: RegisterRequestDto,
    ) -> Result<User, AppError> {
        if users
            .username_or_email_taken(&dto.username, &dto.email, None)
            .await?
        {
            return Err(AppError::conflict(anyhow!(DUPLICATE_USER_MESSAGE)));
        }

        let password_hash = hash_password(&dto.password)?;

        let user = users
            .insert_user(NewUser {
                username: dto.username,
                email: dto.email,
                password_hash: Some(password_hash),
            })
            .await
            .map_err(conflict_or_internal)?;

        info!(user_id = %user.id, "User registered");
        track_user_registered();
        Ok(user)
    }

    /// Checks the credentials and persists a new session. Every failure
    /// returns the same 401.
    #[instrument(skip_all)]
    pub async fn login_user(
        users: &dyn UserStore,
        sessions: &dyn SessionStore,
        policy: &SessionPolicy,
        dto: LoginRequest,
    ) -> Result<(User, Session), AppError> {
        let Some(record) = users.find_user_with_password_by_email(&dto.email).await? else {
            return Err(invalid_credentials("unknown_email"));
        };

        let Some(hash) = record.password_hash.as_deref() else {
            return Err(invalid_credentials("no_password"));
        };

        if !verify_password(&dto.password, hash)? {
            return Err(invalid_credentials("wrong_password"));
        }

        let session = sessions
            .insert_session(policy.issue(record.id, Utc::now()))
            .await?;

        info!(user_id = %record.id, expires_at = %session.expires_at, "Session issued");
        track_login_success();
        track_session_issued();
        Ok((record.into_user(), session))
    }

    /// Deletes the server-side session when `revoke` is set. A token that
    /// is already gone is not an error.
    #[instrument(skip_all, fields(revoke = revoke))]
    pub async fn logout_user(
        sessions: &dyn SessionStore,
        token: Option<&str>,
        revoke: bool,
    ) -> Result<(), AppError> {
        if !revoke {
            return Ok(());
        }

        if let Some(token) = token
            && sessions.delete_session(token).await?
        {
            track_session_revoked();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use taskly_db::MemoryStore;

    fn register_dto() -> RegisterRequestDto {
        RegisterRequestDto {
            username: "alice".into(),
            email: "alice@x.com".into(),
            password: "Passw0rd!".into(),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_only() {
        let store = MemoryStore::new();
        AuthService::register_user(&store, register_dto()).await.unwrap();

        let stored = store
            .find_user_with_password_by_email("alice@x.com")
            .await
            .unwrap()
            .unwrap();
        let hash = stored.password_hash.unwrap();
        assert_ne!(hash, "Passw0rd!");
        assert!(verify_password("Passw0rd!", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_login_failures_are_identical() {
        let store = MemoryStore::new();
        let policy = SessionPolicy::default();
        AuthService::register_user(&store, register_dto()).await.unwrap();
        store
            .insert_user(NewUser {
                username: "nopass".into(),
                email: "nopass@x.com".into(),
                password_hash: None,
            })
            .await
            .unwrap();

        let attempts = [
            login("ghost@x.com", "Passw0rd!"),
            login("alice@x.com", "Wrong1234"),
            login("nopass@x.com", "Passw0rd!"),
        ];
        for attempt in attempts {
            let err = AuthService::login_user(&store, &store, &policy, attempt)
                .await
                .unwrap_err();
            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
            assert_eq!(err.public_message(), INVALID_CREDENTIALS_MESSAGE);
        }
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_then_logout_revokes_session() {
        let store = MemoryStore::new();
        let policy = SessionPolicy::default();
        AuthService::register_user(&store, register_dto()).await.unwrap();

        let (user, session) =
            AuthService::login_user(&store, &store, &policy, login("alice@x.com", "Passw0rd!"))
                .await
                .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(session.token.len(), 64);

        AuthService::logout_user(&store, Some(&session.token), true)
            .await
            .unwrap();
        assert!(store.find_session(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_without_revocation_keeps_session() {
        let store = MemoryStore::new();
        let policy = SessionPolicy::default();
        AuthService::register_user(&store, register_dto()).await.unwrap();
        let (_, session) =
            AuthService::login_user(&store, &store, &policy, login("alice@x.com", "Passw0rd!"))
                .await
                .unwrap();

        AuthService::logout_user(&store, Some(&session.token), false)
            .await
            .unwrap();
        assert!(store.find_session(&session.token).await.unwrap().is_some());
    }
}
