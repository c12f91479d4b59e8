//! Comment repository

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::{
    listing::Page,
    review::{Comment, CommentText},
};

const SELECT_COMMENTS: &str = r#"
    SELECT c.id, c.text, c.author_id, u.username AS author, c.pub_date
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

/// Comment repository for database operations
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the comments of a review, newest first
    pub async fn list(&self, review_id: i64, page: Page) -> DatabaseResult<(Vec<Comment>, i64)> {
        let sql = format!(
            "{SELECT_COMMENTS} WHERE c.review_id = $1 ORDER BY c.pub_date DESC, c.id DESC LIMIT $2 OFFSET $3"
        );
        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(review_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((comments, total))
    }

    /// Find a comment, scoped to the review it belongs to
    pub async fn find(&self, review_id: i64, comment_id: i64) -> DatabaseResult<Option<Comment>> {
        let sql = format!("{SELECT_COMMENTS} WHERE c.id = $1 AND c.review_id = $2");
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(comment_id)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    pub async fn create(
        &self,
        review_id: i64,
        author_id: i64,
        comment: &CommentText,
    ) -> DatabaseResult<Comment> {
        info!("Creating comment on review {} by user {}", review_id, author_id);

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO comments (review_id, author_id, text)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(review_id)
        .bind(author_id)
        .bind(&comment.text)
        .fetch_one(&self.pool)
        .await?;

        self.fetch(id).await
    }

    pub async fn update(&self, comment_id: i64, comment: &CommentText) -> DatabaseResult<Comment> {
        info!("Updating comment: {}", comment_id);

        sqlx::query("UPDATE comments SET text = $2 WHERE id = $1")
            .bind(comment_id)
            .bind(&comment.text)
            .execute(&self.pool)
            .await?;

        self.fetch(comment_id).await
    }

    pub async fn delete(&self, comment_id: i64) -> DatabaseResult<bool> {
        info!("Deleting comment: {}", comment_id);

        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch(&self, comment_id: i64) -> DatabaseResult<Comment> {
        let sql = format!("{SELECT_COMMENTS} WHERE c.id = $1");
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(comment_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(comment)
    }
}
