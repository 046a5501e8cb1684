use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use taskly_config::SESSION_COOKIE_NAME;
use taskly_core::ErrorResponse;
use taskly_models::{
    CreateTaskDto, CreateUserDto, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequestDto, Task, TaskStatus, UpdateTaskDto, UpdateUserDto, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::tasks::controller::get_tasks,
        crate::modules::tasks::controller::create_task,
        crate::modules::tasks::controller::get_task,
        crate::modules::tasks::controller::update_task,
        crate::modules::tasks::controller::delete_task,
        crate::router::health_check,
    ),
    components(
        schemas(
            User,
            CreateUserDto,
            UpdateUserDto,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            Task,
            TaskStatus,
            CreateTaskDto,
            UpdateTaskDto,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and session login/logout"),
        (name = "Users", description = "User management endpoints"),
        (name = "Tasks", description = "Tasks of the authenticated user"),
        (name = "Health", description = "Liveness probe")
    ),
    info(
        title = "Taskly API",
        version = "0.1.0",
        description = "A session-authenticated task management API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
            )
        }
    }
}
