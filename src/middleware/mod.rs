//! Request pipeline for protected routes.
//!
//! - [`session`]: `require_session` resolves the `session_token` cookie and
//!   attaches the [`CurrentUser`]
//! - [`ownership`]: `authorize_task_owner` loads the task from the path and
//!   attaches it as [`OwnedTask`] when the current user owns it
//!
//! Both are applied with `axum::middleware::from_fn_with_state`, session
//! first. Either one short-circuits with an `AppError` response.
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::{CurrentUser, OwnedTask};
//!
//! async fn get_task(CurrentUser(user): CurrentUser, OwnedTask(task): OwnedTask) -> Json<Task> {
//!     Json(task)
//! }
//! ```

pub mod ownership;
pub mod session;

pub use ownership::{OwnedTask, authorize_task, authorize_task_owner};
pub use session::{CurrentUser, require_session, session_token, verify_session};
