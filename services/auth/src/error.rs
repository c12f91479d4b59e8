//! Error types for the authentication service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{error::DatabaseError, validators::FieldError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::mailer::MailError;

/// Custom error type for authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// A request field failed validation
    #[error("{0}")]
    InvalidField(#[from] FieldError),

    /// Username or email already belongs to someone else
    #[error("{0}")]
    Conflict(String),

    /// Unknown username
    #[error("{0}")]
    NotFound(String),

    /// Wrong or expired confirmation code
    #[error("Invalid confirmation code")]
    InvalidCredentials,

    /// The confirmation email could not be delivered
    #[error("Failed to send confirmation email: {0}")]
    EmailDelivery(#[from] MailError),

    /// Database error
    #[error("Database error: {0}")]
    Database(DatabaseError),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<DatabaseError> for AuthError {
    fn from(error: DatabaseError) -> Self {
        match error.unique_constraint() {
            Some("users_username_key") => {
                AuthError::Conflict("A user with that username already exists".to_string())
            }
            Some("users_email_key") => {
                AuthError::Conflict("A user with that email already exists".to_string())
            }
            Some(_) => AuthError::Conflict(error.to_string()),
            None => AuthError::Database(error),
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::InvalidField(FieldError::new("body", rejection.body_text()))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::InvalidField(_) | AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::EmailDelivery(_) => StatusCode::BAD_GATEWAY,
            AuthError::Database(_) | AuthError::InternalServerError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match &self {
            AuthError::InvalidField(field_error) => json!({
                "error": field_error.message,
                "field": field_error.field,
            }),
            AuthError::Database(e) => {
                error!("Database error: {}", e);
                json!({ "error": "Internal server error" })
            }
            AuthError::EmailDelivery(e) => {
                error!("Email delivery failed: {}", e);
                json!({ "error": "Failed to send confirmation email" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
