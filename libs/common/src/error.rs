//! Custom error types for the common library
//!
//! This module defines the storage error taxonomy shared by the services.
//! Constraint violations reported by PostgreSQL are translated into
//! dedicated variants so that handlers can surface them as conflicts
//! instead of opaque internal errors.

use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// PostgreSQL SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A foreign key pointed at a row that does not exist
    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(#[from] MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify a query error, pulling constraint violations out of the
    /// generic `Query` bucket.
    pub fn from_query(error: SqlxError) -> Self {
        if let Some(db_error) = error.as_database_error() {
            let constraint = db_error.constraint().unwrap_or_default().to_string();
            match db_error.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return DatabaseError::UniqueViolation { constraint },
                Some(FOREIGN_KEY_VIOLATION) => {
                    return DatabaseError::ForeignKeyViolation { constraint };
                }
                _ => {}
            }
        }
        DatabaseError::Query(error)
    }

    /// Name of the violated unique constraint, if this is a unique violation
    pub fn unique_constraint(&self) -> Option<&str> {
        match self {
            DatabaseError::UniqueViolation { constraint } => Some(constraint),
            _ => None,
        }
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(error: SqlxError) -> Self {
        DatabaseError::from_query(error)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_query_errors() {
        let error = DatabaseError::from_query(SqlxError::RowNotFound);
        assert!(matches!(error, DatabaseError::Query(SqlxError::RowNotFound)));
        assert_eq!(error.unique_constraint(), None);
    }

    #[test]
    fn unique_violation_exposes_constraint_name() {
        let error = DatabaseError::UniqueViolation {
            constraint: "categories_slug_key".to_string(),
        };
        assert_eq!(error.unique_constraint(), Some("categories_slug_key"));
        assert_eq!(
            error.to_string(),
            "Unique constraint violated: categories_slug_key"
        );
    }
}
