//! Task ownership authorization.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use taskly_core::AppError;
use taskly_db::TaskStore;
use taskly_models::{Task, TaskId, User};
use tracing::warn;

use crate::metrics::track_ownership_denied;
use crate::middleware::session::{CurrentUser, MISSING_SESSION_MESSAGE};
use crate::state::AppState;

pub const NOT_OWNER_MESSAGE: &str = "You are not allowed to access this task";

/// A task loaded from the path and confirmed to belong to the
/// [`CurrentUser`].
#[derive(Debug, Clone)]
pub struct OwnedTask(pub Task);

impl<S> FromRequestParts<S> for OwnedTask
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<OwnedTask>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(NOT_OWNER_MESSAGE))
    }
}

/// Loads the task named by `raw_id` and checks that `user` owns it.
pub async fn authorize_task(
    tasks: &dyn TaskStore,
    user: &User,
    raw_id: &str,
) -> Result<Task, AppError> {
    let id: TaskId = raw_id
        .parse()
        .map_err(|_| AppError::bad_request(anyhow!("Invalid task ID")))?;

    let task = tasks
        .find_task(id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Task not found")))?;

    if task.user_id != user.id {
        warn!(
            task_id = %task.id,
            owner_id = %task.user_id,
            user_id = %user.id,
            "Task ownership denied"
        );
        track_ownership_denied();
        return Err(AppError::unauthorized(NOT_OWNER_MESSAGE));
    }

    Ok(task)
}

/// Runs after [`require_session`](super::require_session) on `/tasks/{id}`
/// routes and attaches the task as [`OwnedTask`].
pub async fn authorize_task_owner(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let CurrentUser(user) = req
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or_else(|| AppError::unauthorized(MISSING_SESSION_MESSAGE))?;

    let task = authorize_task(state.tasks.as_ref(), &user, &raw_id).await?;

    req.extensions_mut().insert(OwnedTask(task));
    Ok(next.run(req).await)
}
