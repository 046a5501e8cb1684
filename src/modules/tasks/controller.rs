use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use taskly_core::{AppError, ErrorResponse};
use taskly_models::{CreateTaskDto, MessageResponse, Task, TaskFilterParams, UpdateTaskDto};

use crate::middleware::{CurrentUser, OwnedTask};
use crate::modules::tasks::service::TaskService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/tasks",
    params(TaskFilterParams),
    responses(
        (status = 200, description = "Tasks of the current user", body = Vec<Task>),
        (status = 400, description = "Invalid status filter", body = ErrorResponse),
        (status = 401, description = "Missing, unknown or expired session", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("session_cookie" = []))
)]
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<TaskFilterParams>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = TaskService::get_tasks(state.tasks.as_ref(), user.id, filter).await?;
    Ok(Json(tasks))
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskDto,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Validation error or unknown user", body = ErrorResponse),
        (status = 401, description = "No session, or user_id names another user", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("session_cookie" = []))
)]
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateTaskDto>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task =
        TaskService::create_task(state.tasks.as_ref(), state.users.as_ref(), &user, dto).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task details", body = Task),
        (status = 400, description = "Invalid task ID", body = ErrorResponse),
        (status = 401, description = "No session, or the task belongs to another user", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("session_cookie" = []))
)]
#[instrument(skip_all, fields(task_id = %task.id))]
pub async fn get_task(OwnedTask(task): OwnedTask) -> Json<Task> {
    Json(task)
}

#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    request_body = UpdateTaskDto,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid ID, title or status, or owner change", body = ErrorResponse),
        (status = 401, description = "No session, or the task belongs to another user", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("session_cookie" = []))
)]
#[instrument(skip(state, task), fields(task_id = %task.id))]
pub async fn update_task(
    State(state): State<AppState>,
    OwnedTask(task): OwnedTask,
    ValidatedJson(dto): ValidatedJson<UpdateTaskDto>,
) -> Result<Json<Task>, AppError> {
    let task = TaskService::update_task(state.tasks.as_ref(), task, dto).await?;
    Ok(Json(task))
}

#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 401, description = "No session, or the task belongs to another user", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks",
    security(("session_cookie" = []))
)]
#[instrument(skip(state, task), fields(task_id = %task.id))]
pub async fn delete_task(
    State(state): State<AppState>,
    OwnedTask(task): OwnedTask,
) -> Result<Json<MessageResponse>, AppError> {
    TaskService::delete_task(state.tasks.as_ref(), task).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
