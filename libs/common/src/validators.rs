//! Field validation rules shared by registration and entity construction
//!
//! Each rule is a pure function: it either returns the value unchanged or a
//! [`FieldError`] naming the offending field. Rules never aggregate; callers
//! report the first failure.

use chrono::{Datelike, Utc};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Maximum length of usernames and personal names
pub const NAME_MAX_LENGTH: usize = 150;
/// Maximum length of email addresses
pub const EMAIL_MAX_LENGTH: usize = 254;
/// Maximum length of catalog names
pub const CHAR_FIELD_MAX_LENGTH: usize = 256;
/// Maximum length of category and genre slugs
pub const SLUG_MAX_LENGTH: usize = 50;
/// Username reserved for the `users/me` route
pub const RESERVED_USERNAME: &str = "me";

/// A single invalid field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Inclusive bounds for review scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBounds {
    pub min: i16,
    pub max: i16,
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

/// Validate username
pub fn validate_username(username: &str) -> Result<&str, FieldError> {
    if username.chars().count() > NAME_MAX_LENGTH {
        return Err(FieldError::new(
            "username",
            format!("Username must be at most {NAME_MAX_LENGTH} characters long"),
        ));
    }

    if username == RESERVED_USERNAME {
        return Err(FieldError::new(
            "username",
            format!("Username '{RESERVED_USERNAME}' is reserved"),
        ));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.@+-]+$").expect("Failed to compile username regex")
    });

    if !regex.is_match(username) {
        let forbidden: String = username
            .chars()
            .filter(|c| !(c.is_ascii_alphanumeric() || "_.@+-".contains(*c)))
            .collect();
        let message = if username.is_empty() {
            "Username is required".to_string()
        } else {
            format!("Username contains forbidden characters: {forbidden}")
        };
        return Err(FieldError::new("username", message));
    }

    Ok(username)
}

/// Validate email length
pub fn validate_email(email: &str) -> Result<&str, FieldError> {
    if email.chars().count() > EMAIL_MAX_LENGTH {
        return Err(FieldError::new(
            "email",
            format!("Email must be at most {EMAIL_MAX_LENGTH} characters long"),
        ));
    }

    Ok(email)
}

/// Validate email length and address shape
pub fn validate_email_address(email: &str) -> Result<&str, FieldError> {
    validate_email(email)?;

    if email.is_empty() {
        return Err(FieldError::new("email", "Email is required"));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(FieldError::new("email", "Invalid email format"));
    }

    Ok(email)
}

/// Validate that `year` is not in the future, using the wall clock
pub fn validate_max_year(year: i32) -> Result<i32, FieldError> {
    validate_max_year_against(year, Utc::now().year())
}

/// Validate that `year` does not exceed `current_year`
pub fn validate_max_year_against(year: i32, current_year: i32) -> Result<i32, FieldError> {
    if year > current_year {
        return Err(FieldError::new(
            "year",
            format!("Year cannot be greater than {current_year}"),
        ));
    }
    Ok(year)
}

/// Validate that `year` is not earlier than `minimum`
pub fn validate_min_year(year: i32, minimum: i32) -> Result<i32, FieldError> {
    if year < minimum {
        return Err(FieldError::new(
            "year",
            format!("Year cannot be earlier than {minimum}"),
        ));
    }
    Ok(year)
}

/// Validate a review score against inclusive bounds
pub fn validate_score(score: i16, bounds: ScoreBounds) -> Result<i16, FieldError> {
    if score < bounds.min || score > bounds.max {
        return Err(FieldError::new(
            "score",
            format!("Score must be between {} and {}", bounds.min, bounds.max),
        ));
    }
    Ok(score)
}

/// Validate a category or genre slug
pub fn validate_slug(slug: &str) -> Result<&str, FieldError> {
    if slug.chars().count() > SLUG_MAX_LENGTH {
        return Err(FieldError::new(
            "slug",
            format!("Slug must be at most {SLUG_MAX_LENGTH} characters long"),
        ));
    }

    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SLUG_REGEX
        .get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("Failed to compile slug regex"));

    if !regex.is_match(slug) {
        return Err(FieldError::new(
            "slug",
            "Slug can only contain letters, numbers, hyphens and underscores",
        ));
    }

    Ok(slug)
}

/// Validate a required, length-bounded text field
pub fn validate_length<'a>(
    field: &'static str,
    value: &'a str,
    max: usize,
) -> Result<&'a str, FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "This field may not be blank"));
    }
    if value.chars().count() > max {
        return Err(FieldError::new(
            field,
            format!("Ensure this field has no more than {max} characters"),
        ));
    }
    Ok(value)
}

/// Validate an optional, length-bounded text field that may be blank
pub fn validate_max_length<'a>(
    field: &'static str,
    value: &'a str,
    max: usize,
) -> Result<&'a str, FieldError> {
    if value.chars().count() > max {
        return Err(FieldError::new(
            field,
            format!("Ensure this field has no more than {max} characters"),
        ));
    }
    Ok(value)
}
