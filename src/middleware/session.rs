//! Session verification.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use taskly_auth::{SessionPolicy, SessionState};
use taskly_config::SESSION_COOKIE_NAME;
use taskly_core::AppError;
use taskly_db::{SessionStore, UserStore};
use taskly_models::User;
use tracing::{error, warn};

use crate::metrics::track_session_rejected;
use crate::state::AppState;

pub const MISSING_SESSION_MESSAGE: &str = "Authentication required";
/// Shared by unknown and expired tokens.
pub const INVALID_SESSION_MESSAGE: &str = "Invalid or expired session";

/// The user resolved from a valid session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(MISSING_SESSION_MESSAGE))
    }
}

/// Reads the session token from the cookie jar, treating an empty value as
/// absent.
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value())
        .filter(|token| !token.is_empty())
}

/// Resolves a session token to its user.
///
/// Missing, unknown and expired tokens are all 401; unknown and expired
/// share one message and are told apart only in logs and metrics.
pub async fn verify_session(
    sessions: &dyn SessionStore,
    users: &dyn UserStore,
    policy: &SessionPolicy,
    token: Option<&str>,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    let Some(token) = token else {
        track_session_rejected("missing");
        return Err(AppError::unauthorized(MISSING_SESSION_MESSAGE));
    };

    let Some(session) = sessions.find_session(token).await? else {
        warn!("Rejected unknown session token");
        track_session_rejected("unknown");
        return Err(AppError::unauthorized(INVALID_SESSION_MESSAGE));
    };

    if policy.check(&session, now) == SessionState::Expired {
        warn!(
            user_id = %session.user_id,
            expires_at = %session.expires_at,
            "Rejected expired session"
        );
        track_session_rejected("expired");
        return Err(AppError::unauthorized(INVALID_SESSION_MESSAGE));
    }

    match users.find_user(session.user_id).await? {
        Some(user) => Ok(user),
        None => {
            error!(user_id = %session.user_id, "Session references a missing user");
            Err(AppError::internal(anyhow::anyhow!(
                "session {} references missing user {}",
                session.id,
                session.user_id
            )))
        }
    }
}

/// Rejects the request unless it carries a valid `session_token` cookie,
/// then attaches the session's user as [`CurrentUser`].
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = verify_session(
        state.sessions.as_ref(),
        state.users.as_ref(),
        &state.session_policy,
        session_token(&jar),
        Utc::now(),
    )
    .await?;

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
