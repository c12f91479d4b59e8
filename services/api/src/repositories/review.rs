//! Review repository

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::{
    listing::Page,
    review::{CreateReview, Review, UpdateReview},
};

const SELECT_REVIEWS: &str = r#"
    SELECT r.id, r.text, r.author_id, u.username AS author, r.pub_date, r.score
    FROM reviews r
    JOIN users u ON u.id = r.author_id
"#;

/// Review repository for database operations
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Create a new review repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the reviews of a title, newest first
    pub async fn list(&self, title_id: i64, page: Page) -> DatabaseResult<(Vec<Review>, i64)> {
        let sql = format!(
            "{SELECT_REVIEWS} WHERE r.title_id = $1 ORDER BY r.pub_date DESC, r.id DESC LIMIT $2 OFFSET $3"
        );
        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(title_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE title_id = $1")
            .bind(title_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((reviews, total))
    }

    /// Find a review, scoped to the title it belongs to
    pub async fn find(&self, title_id: i64, review_id: i64) -> DatabaseResult<Option<Review>> {
        let sql = format!("{SELECT_REVIEWS} WHERE r.id = $1 AND r.title_id = $2");
        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(review_id)
            .bind(title_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    /// Create a review; a second review by the same author on the same title
    /// surfaces as a unique violation
    pub async fn create(
        &self,
        title_id: i64,
        author_id: i64,
        review: &CreateReview,
    ) -> DatabaseResult<Review> {
        info!("Creating review on title {} by user {}", title_id, author_id);

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (title_id, author_id, text, score)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(title_id)
        .bind(author_id)
        .bind(&review.text)
        .bind(review.score)
        .fetch_one(&self.pool)
        .await?;

        self.fetch(id).await
    }

    /// Apply a partial update
    pub async fn update(&self, review_id: i64, update: &UpdateReview) -> DatabaseResult<Review> {
        info!("Updating review: {}", review_id);

        sqlx::query(
            r#"
            UPDATE reviews
            SET text = COALESCE($2, text), score = COALESCE($3, score)
            WHERE id = $1
            "#,
        )
        .bind(review_id)
        .bind(&update.text)
        .bind(update.score)
        .execute(&self.pool)
        .await?;

        self.fetch(review_id).await
    }

    /// Delete a review; its comments go with it
    pub async fn delete(&self, review_id: i64) -> DatabaseResult<bool> {
        info!("Deleting review: {}", review_id);

        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch(&self, review_id: i64) -> DatabaseResult<Review> {
        let sql = format!("{SELECT_REVIEWS} WHERE r.id = $1");
        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(review_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(review)
    }
}
