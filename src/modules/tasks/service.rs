use anyhow::anyhow;
use taskly_core::{AppError, validation::validate_task_title};
use taskly_db::{StoreError, TaskStore, UserStore};
use taskly_models::{
    CreateTaskDto, NewTask, Task, TaskFilterParams, TaskStatus, UpdateTaskDto, User, UserId,
};
use tracing::{info, instrument, warn};

use crate::metrics::{track_ownership_denied, track_task_operation};
use crate::middleware::ownership::NOT_OWNER_MESSAGE;

fn parse_status(raw: &str) -> Result<TaskStatus, AppError> {
    raw.parse::<TaskStatus>().map_err(AppError::bad_request)
}

pub struct TaskService;

impl TaskService {
    /// Tasks of `owner`, optionally narrowed to one status. An empty
    /// `status` means no filter.
    #[instrument(skip(tasks))]
    pub async fn get_tasks(
        tasks: &dyn TaskStore,
        owner: UserId,
        filter: TaskFilterParams,
    ) -> Result<Vec<Task>, AppError> {
        let status = filter
            .status
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(parse_status)
            .transpose()?;
        Ok(tasks.list_tasks(owner, status).await?)
    }

    /// Creates a task for `current`. An explicit `user_id` must name an
    /// existing user and must be the caller.
    #[instrument(skip(tasks, users, current), fields(user_id = %current.id))]
    pub async fn create_task(
        tasks: &dyn TaskStore,
        users: &dyn UserStore,
        current: &User,
        dto: CreateTaskDto,
    ) -> Result<Task, AppError> {
        let owner = dto.user_id.unwrap_or(current.id);
        if owner != current.id {
            if users.find_user(owner).await?.is_none() {
                return Err(AppError::bad_request(anyhow!("Associated user not found")));
            }
            warn!(requested_owner = %owner, "Task creation for another user denied");
            track_ownership_denied();
            return Err(AppError::unauthorized(NOT_OWNER_MESSAGE));
        }

        let status = parse_status(&dto.status)?;
        let title = dto.title.trim();
        if title.is_empty() {
            return Err(AppError::bad_request(anyhow!("Title is required")));
        }

        let task = tasks
            .insert_task(NewTask {
                title: title.to_string(),
                status,
                user_id: owner,
            })
            .await
            .map_err(|err| match err {
                StoreError::ForeignKeyViolation(_) => {
                    AppError::bad_request(anyhow!("Associated user not found"))
                }
                other => AppError::internal(other),
            })?;

        info!(task_id = %task.id, "Task created");
        track_task_operation("create");
        Ok(task)
    }

    /// Applies a partial update to an owned task. Every field is checked
    /// before the single write, so a rejected update changes nothing.
    #[instrument(skip(tasks, existing), fields(task_id = %existing.id))]
    pub async fn update_task(
        tasks: &dyn TaskStore,
        existing: Task,
        dto: UpdateTaskDto,
    ) -> Result<Task, AppError> {
        if let Some(user_id) = dto.user_id
            && user_id != existing.user_id
        {
            return Err(AppError::bad_request(anyhow!(
                "The owner of a task cannot be changed"
            )));
        }

        let status = match dto.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => existing.status,
        };

        let title = match dto.title.as_deref().map(str::trim) {
            Some(title) if title != existing.title => {
                validate_task_title(title).map_err(|err| {
                    AppError::bad_request(anyhow!("{}", err.message.unwrap_or_default()))
                })?;
                title.to_string()
            }
            _ => existing.title.clone(),
        };

        let task = tasks
            .update_task(existing.id, &title, status)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Task not found")))?;

        track_task_operation("update");
        Ok(task)
    }

    #[instrument(skip(tasks, task), fields(task_id = %task.id))]
    pub async fn delete_task(tasks: &dyn TaskStore, task: Task) -> Result<(), AppError> {
        if !tasks.delete_task(task.id).await? {
            return Err(AppError::not_found(anyhow!("Task not found")));
        }
        track_task_operation("delete");
        Ok(())
    }
}
