//! # Taskly Models
//!
//! Domain models and DTOs for the Taskly API.
//!
//! - [`auth`]: Registration, login and generic message payloads
//! - [`ids`]: Strongly-typed numeric identifiers
//! - [`sessions`]: Server-side session records
//! - [`tasks`]: Tasks, the status enumeration and task DTOs
//! - [`users`]: Users, stored credentials and user DTOs
//!
//! # Example
//!
//! ```ignore
//! use taskly_models::tasks::TaskStatus;
//!
//! let status: TaskStatus = "in-progress".parse()?;
//! assert_eq!(status.as_str(), "in-progress");
//! ```

pub mod auth;
pub mod ids;
pub mod sessions;
pub mod tasks;
pub mod users;

pub use auth::{LoginRequest, LoginResponse, MessageResponse, RegisterRequestDto};
pub use ids::{IdParseError, SessionId, TaskId, UserId};
pub use sessions::{NewSession, Session};
pub use tasks::{
    CreateTaskDto, NewTask, Task, TaskFilterParams, TaskStatus, TaskStatusError, UpdateTaskDto,
};
pub use users::{CreateUserDto, NewUser, UpdateUserDto, User, UserWithPassword};
