use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use taskly_config::{SESSION_COOKIE_NAME, SessionConfig};
use tracing::instrument;

use taskly_core::{AppError, ErrorResponse};
use taskly_models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequestDto, User};

use crate::middleware::session_token;
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// `session_token` cookie carrying a freshly issued token.
pub fn session_cookie(token: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .http_only(true)
        .secure(config.cookie_secure)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.ttl().num_seconds()))
        .build()
}

/// Overwrites the session cookie with an empty, immediately expiring one.
pub fn cleared_session_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .secure(config.cookie_secure)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = User),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::register_user(state.users.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive the session cookie
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; the token is set in the `session_token` cookie", body = LoginResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let (user, session) = AuthService::login_user(
        state.users.as_ref(),
        state.sessions.as_ref(),
        &state.session_policy,
        dto,
    )
    .await?;

    let jar = jar.add(session_cookie(session.token, &state.session_config));
    let response = LoginResponse {
        message: "Login successful".to_string(),
        user,
        expires_at: session.expires_at,
    };

    Ok((jar, Json(response)))
}

/// Log out and clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out; the session cookie is cleared", body = MessageResponse),
        (status = 401, description = "Missing, unknown or expired session", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("session_cookie" = []))
)]
#[instrument(skip_all)]
pub async fn logout_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    AuthService::logout_user(
        state.sessions.as_ref(),
        session_token(&jar),
        state.session_config.revoke_on_logout,
    )
    .await?;

    let jar = jar.add(cleared_session_cookie(&state.session_config));
    Ok((jar, Json(MessageResponse::new("Logged out successfully"))))
}
