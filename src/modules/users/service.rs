use anyhow::anyhow;
use taskly_core::{AppError, hash_password};
use taskly_db::{StoreError, UserStore};
use taskly_models::{CreateUserDto, NewUser, UpdateUserDto, User, UserId};
use tracing::instrument;

use crate::metrics::track_user_created;

pub const DUPLICATE_USER_MESSAGE: &str = "Username or email already exists";

/// Unique violations that slip past the existence check (two concurrent
/// inserts) still surface as a conflict.
pub(crate) fn conflict_or_internal(err: StoreError) -> AppError {
    if err.is_unique_violation() {
        AppError::conflict(anyhow!(DUPLICATE_USER_MESSAGE))
    } else {
        AppError::internal(err)
    }
}

pub struct UserService;

impl UserService {
    #[instrument(skip(users))]
    pub async fn get_users(users: &dyn UserStore) -> Result<Vec<User>, AppError> {
        Ok(users.list_users().await?)
    }

    #[instrument(skip(users))]
    pub async fn get_user(users: &dyn UserStore, id: UserId) -> Result<User, AppError> {
        users
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    #[instrument(skip(users, dto), fields(username = %dto.username))]
    pub async fn create_user(users: &dyn UserStore, dto: CreateUserDto) -> Result<User, AppError> {
        if users
            .username_or_email_taken(&dto.username, &dto.email, None)
            .await?
        {
            return Err(AppError::conflict(anyhow!(DUPLICATE_USER_MESSAGE)));
        }

        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let user = users
            .insert_user(NewUser {
                username: dto.username,
                email: dto.email,
                password_hash,
            })
            .await
            .map_err(conflict_or_internal)?;

        track_user_created();
        Ok(user)
    }

    #[instrument(skip(users, dto))]
    pub async fn update_user(
        users: &dyn UserStore,
        id: UserId,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        Self::get_user(users, id).await?;

        if users
            .username_or_email_taken(&dto.username, &dto.email, Some(id))
            .await?
        {
            return Err(AppError::conflict(anyhow!(DUPLICATE_USER_MESSAGE)));
        }

        users
            .update_user(id, &dto.username, &dto.email)
            .await
            .map_err(conflict_or_internal)?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Tasks and sessions of the user go with it.
    #[instrument(skip(users))]
    pub async fn delete_user(users: &dyn UserStore, id: UserId) -> Result<(), AppError> {
        if !users.delete_user(id).await? {
            return Err(AppError::not_found(anyhow!("User not found")));
        }
        Ok(())
    }
}
