//! Field rules shared by request DTOs.
//!
//! Each `validate_*` function has the shape expected by
//! `#[validate(custom(function = "..."))]`, so the same rule is enforced for
//! JSON bodies, the CLI and the services.

use std::borrow::Cow;
use std::sync::LazyLock;

use anyhow::anyhow;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::AppError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const EMAIL_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const TASK_TITLE_MIN_LEN: usize = 4;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,20}$").expect("valid username regex"));

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

// Letters of any script, ASCII digits and whitespace.
static TASK_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}0-9\s]{4,}$").expect("valid title regex"));

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(invalid(
            "username_length",
            "Username must be at most 20 characters",
        ));
    }
    if !USERNAME_REGEX.is_match(username) {
        return Err(invalid(
            "username_format",
            "Username must be 3-20 characters of letters, digits, '_' or '-'",
        ));
    }
    Ok(())
}

pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(invalid("email_length", "Email must be at most 50 characters"));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(invalid("email_format", "Invalid email format"));
    }
    Ok(())
}

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= PASSWORD_MIN_LEN;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(invalid(
            "password_strength",
            "Password must be at least 8 characters and contain an uppercase letter, a lowercase letter and a digit",
        ))
    }
}

pub fn validate_non_blank_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(invalid("title_required", "Title is required"));
    }
    Ok(())
}

/// Rule applied when a title is changed: at least four letters, digits or
/// spaces once surrounding whitespace is trimmed.
pub fn validate_task_title(title: &str) -> Result<(), ValidationError> {
    if !TASK_TITLE_REGEX.is_match(title.trim()) {
        return Err(invalid(
            "title_format",
            "Title must contain at least 4 letters, digits or spaces",
        ));
    }
    Ok(())
}

pub fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>();
    // field_errors() is backed by a HashMap
    messages.sort();
    messages.join(", ")
}

/// Runs the `Validate` rules of a DTO and maps failures to a 400.
pub fn validate_request<T: Validate>(dto: &T) -> Result<(), AppError> {
    dto.validate()
        .map_err(|errors| AppError::bad_request(anyhow!("{}", format_errors(&errors))))
}
