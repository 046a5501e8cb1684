//! # Taskly Core
//!
//! Core types, errors, and utilities for the Taskly API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: bcrypt password hashing and verification
//! - [`validation`]: Field rules shared by request DTOs (username, email,
//!   password strength, task titles)
//!
//! # Example
//!
//! ```ignore
//! use taskly_core::errors::AppError;
//! use taskly_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Task not found"));
//! let hash = hash_password("Passw0rd!")?;
//! assert!(verify_password("Passw0rd!", &hash)?);
//! ```

pub mod errors;
pub mod password;
pub mod validation;

pub use errors::{AppError, ErrorResponse};
pub use password::{hash_password, verify_password};
pub use validation::validate_request;
