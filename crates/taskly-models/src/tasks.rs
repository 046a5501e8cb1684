//! Task domain models and DTOs.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Database, Decode, Encode, FromRow, Type, postgres::PgTypeInfo};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::ids::{TaskId, UserId};

/// Workflow state of a task.
///
/// A flat enumeration: any state may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    pub const fn as_str(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "to-do",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the three task statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusError(pub String);

impl fmt::Display for TaskStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Options: 'to-do', 'in-progress', 'done'",
            self.0
        )
    }
}

impl std::error::Error for TaskStatusError {}

impl FromStr for TaskStatus {
    type Err = TaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TaskStatusError(s.to_string()))
    }
}

impl Type<sqlx::Postgres> for TaskStatus {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for TaskStatus {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for TaskStatus {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

/// Custom validator for status strings in request bodies.
pub fn validate_task_status(status: &str) -> Result<(), ValidationError> {
    status.parse::<TaskStatus>().map(|_| ()).map_err(|err| {
        ValidationError::new("status").with_message(Cow::Owned(err.to_string()))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values needed to insert a task row. The title is already trimmed.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub status: TaskStatus,
    pub user_id: UserId,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTaskDto {
    #[validate(custom(function = "taskly_core::validation::validate_non_blank_title"))]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[validate(custom(function = "validate_task_status"))]
    #[schema(example = "to-do")]
    pub status: String,
    /// Defaults to the authenticated user. Any other value is rejected.
    pub user_id: Option<UserId>,
}

/// Body of `PUT /tasks/{id}`. Only changed fields are validated, which
/// happens in the task service against the stored task.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskDto {
    pub title: Option<String>,
    pub status: Option<String>,
    /// Must be absent or equal to the current owner.
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct TaskFilterParams {
    /// One of `to-do`, `in-progress`, `done`.
    pub status: Option<String>,
}
