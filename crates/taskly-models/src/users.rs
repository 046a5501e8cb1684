//! User domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;

/// A user account as exposed by the API. The password hash is never part of
/// this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user row together with its stored bcrypt hash. Only the authentication
/// service reads this.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithPassword {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// `None` for accounts created through `POST /users` without a password.
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserWithPassword {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Values needed to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(custom(function = "taskly_core::validation::validate_username"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(custom(function = "taskly_core::validation::validate_email_format"))]
    #[schema(example = "alice@x.com")]
    pub email: String,
    /// Optional; an account without a password cannot log in.
    #[validate(custom(function = "taskly_core::validation::validate_password_strength"))]
    pub password: Option<String>,
}

/// Body of `PUT /users/{id}`. Both fields are required.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(custom(function = "taskly_core::validation::validate_username"))]
    pub username: String,
    #[validate(custom(function = "taskly_core::validation::validate_email_format"))]
    pub email: String,
}
