//! User repository for sign-up and token exchange

use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use common::models::User;
use sqlx::PgPool;
use tracing::info;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user pending confirmation
    ///
    /// A concurrent sign-up for the same username or email surfaces as
    /// [`DatabaseError::UniqueViolation`].
    pub async fn create(&self, username: &str, email: &str) -> DatabaseResult<User> {
        info!("Creating new user: {}", username);

        let sql = format!(
            "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING {}",
            User::COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        info!("Finding user by username: {}", username);

        let sql = format!("SELECT {} FROM users WHERE username = $1", User::COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Load every account owning the username or the email in one read
    pub async fn find_owners(&self, username: &str, email: &str) -> DatabaseResult<Vec<User>> {
        info!("Finding owners of username {} or email {}", username, email);

        let sql = format!(
            "SELECT {} FROM users WHERE username = $1 OR email = $2 ORDER BY id",
            User::COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(email)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Replace the stored confirmation code hash
    pub async fn store_confirmation(
        &self,
        user_id: i64,
        code_hash: &str,
        issued_at: DateTime<Utc>,
    ) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET confirmation_code_hash = $2, confirmation_issued_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(code_hash)
        .bind(issued_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record the first successful token exchange
    pub async fn mark_confirmed(&self, user_id: i64) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET confirmed_at = COALESCE(confirmed_at, NOW()), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
