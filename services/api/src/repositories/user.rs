//! User repository for identity lookup and user management

use common::error::DatabaseResult;
use common::models::User;
use sqlx::PgPool;
use tracing::info;

use crate::models::{
    listing::{ListQuery, like_pattern},
    user::{CreateUser, UpdateUser},
};

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", User::COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", User::COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// List users ordered by username, optionally filtered by username substring
    pub async fn list(&self, query: &ListQuery) -> DatabaseResult<(Vec<User>, i64)> {
        let page = query.page();
        let pattern = query.search().map(like_pattern);

        let sql = format!(
            r#"
            SELECT {}
            FROM users
            WHERE ($1::text IS NULL OR username ILIKE $1)
            ORDER BY username
            LIMIT $2 OFFSET $3
            "#,
            User::COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(&pattern)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR username ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((users, total))
    }

    /// Create a user on behalf of an admin
    pub async fn create(&self, user: &CreateUser) -> DatabaseResult<User> {
        info!("Creating user: {}", user.username);

        let sql = format!(
            r#"
            INSERT INTO users (username, email, first_name, last_name, bio, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            User::COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.bio)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Apply a partial update
    pub async fn update(&self, id: i64, update: &UpdateUser) -> DatabaseResult<User> {
        info!("Updating user: {}", id);

        let sql = format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio),
                role = COALESCE($7, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            User::COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&update.username)
            .bind(&update.email)
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(&update.bio)
            .bind(update.role)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    /// Delete a user; their reviews and comments go with them
    pub async fn delete(&self, username: &str) -> DatabaseResult<bool> {
        info!("Deleting user: {}", username);

        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
