//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{error::DatabaseError, validators::FieldError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// A request field failed validation
    #[error("{0}")]
    InvalidField(#[from] FieldError),

    /// A uniqueness rule rejected the write
    #[error("{0}")]
    Conflict(String),

    /// Anonymous caller denied
    #[error("Authentication credentials were not provided or are invalid")]
    Unauthorized,

    /// Authenticated caller denied
    #[error("You do not have permission to perform this action")]
    PermissionDenied,

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// The route exists but does not accept this method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for ApiError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::UniqueViolation { constraint } => {
                ApiError::Conflict(conflict_message(&constraint).to_string())
            }
            DatabaseError::ForeignKeyViolation { constraint } => {
                let field = if constraint.contains("category") {
                    "category"
                } else if constraint.contains("genre") {
                    "genre"
                } else if constraint.contains("title") {
                    "title"
                } else if constraint.contains("review") {
                    "review"
                } else {
                    "body"
                };
                ApiError::InvalidField(FieldError::new(field, "Referenced object does not exist"))
            }
            other => ApiError::Database(other),
        }
    }
}

fn conflict_message(constraint: &str) -> &'static str {
    match constraint {
        "users_username_key" => "A user with that username already exists",
        "users_email_key" => "A user with that email already exists",
        "categories_slug_key" => "A category with this slug already exists",
        "genres_slug_key" => "A genre with this slug already exists",
        "reviews_title_author_key" => "You have already reviewed this title",
        _ => "Object already exists",
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidField(FieldError::new("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidField(FieldError::new("query", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound("Not found".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidField(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InternalServerError | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match &self {
            ApiError::InvalidField(field_error) => json!({
                "error": field_error.message,
                "field": field_error.field,
            }),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_review_is_a_conflict() {
        let error = ApiError::from(DatabaseError::UniqueViolation {
            constraint: "reviews_title_author_key".to_string(),
        });
        assert!(matches!(&error, ApiError::Conflict(message) if message.contains("already reviewed")));
        assert_eq!(error.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_category_is_a_field_error() {
        let error = ApiError::from(DatabaseError::ForeignKeyViolation {
            constraint: "titles_category_id_fkey".to_string(),
        });
        assert!(matches!(error, ApiError::InvalidField(ref e) if e.field == "category"));
    }

    #[test]
    fn other_database_errors_are_redacted() {
        let error = ApiError::from(DatabaseError::Configuration("secret dsn".to_string()));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        let cases = [
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::PermissionDenied, StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
