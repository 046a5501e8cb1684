//! Authentication request and response payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::User;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(custom(function = "taskly_core::validation::validate_username"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(custom(function = "taskly_core::validation::validate_email_format"))]
    #[schema(example = "alice@x.com")]
    pub email: String,
    #[validate(custom(function = "taskly_core::validation::validate_password_strength"))]
    #[schema(example = "Passw0rd!")]
    pub password: String,
}

// No format rules here: any malformed email simply fails to match a user,
// which keeps every login failure identical.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice@x.com")]
    pub email: String,
    #[schema(example = "Passw0rd!")]
    pub password: String,
}

/// The token itself travels only in the `Set-Cookie` header.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
