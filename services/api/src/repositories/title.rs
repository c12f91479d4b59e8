//! Title repository
//!
//! Titles are always returned with their category, genres and review scores
//! attached. Writes that touch genre links run in a single transaction.

use common::error::{DatabaseError, DatabaseResult};
use common::validators::FieldError;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::HashMap;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        catalog::CatalogEntry,
        listing::{Page, like_pattern},
        title::{CreateTitle, TitleOrdering, TitleQuery, TitleResponse, TitleRow, UpdateTitle},
    },
};

const SELECT_TITLES: &str = r#"
    SELECT t.id, t.name, t.year, t.description,
           ARRAY(SELECT r.score FROM reviews r WHERE r.title_id = t.id ORDER BY r.id) AS scores,
           (SELECT AVG(r.score)::float8 FROM reviews r WHERE r.title_id = t.id) AS rating,
           c.name AS category_name, c.slug AS category_slug
    FROM titles t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &TitleQuery) {
    builder.push(" WHERE TRUE");

    if let Some(category) = non_blank(&query.category) {
        builder.push(" AND c.slug = ").push_bind(category.to_string());
    }
    if let Some(genre) = non_blank(&query.genre) {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM title_genres tg JOIN genres g ON g.id = tg.genre_id \
                 WHERE tg.title_id = t.id AND g.slug = ",
            )
            .push_bind(genre.to_string())
            .push(")");
    }
    if let Some(name) = non_blank(&query.name) {
        builder.push(" AND t.name ILIKE ").push_bind(like_pattern(name));
    }
    if let Some(year) = query.year {
        builder.push(" AND t.year = ").push_bind(year);
    }
}

/// Title repository for database operations
#[derive(Clone)]
pub struct TitleRepository {
    pool: PgPool,
}

impl TitleRepository {
    /// Create a new title repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List titles matching the query filters
    pub async fn list(
        &self,
        query: &TitleQuery,
        ordering: TitleOrdering,
        page: Page,
    ) -> DatabaseResult<(Vec<TitleResponse>, i64)> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_TITLES);
        push_filters(&mut builder, query);
        builder
            .push(" ORDER BY ")
            .push(ordering.sql())
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = builder.build_query_as::<TitleRow>().fetch_all(&self.pool).await?;

        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM titles t LEFT JOIN categories c ON c.id = t.category_id",
        );
        push_filters(&mut count, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let titles = self.attach_genres(rows).await?;
        Ok((titles, total))
    }

    /// Find a title by ID
    pub async fn find(&self, id: i64) -> DatabaseResult<Option<TitleResponse>> {
        let sql = format!("{SELECT_TITLES} WHERE t.id = $1");
        let row = sqlx::query_as::<_, TitleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_genres(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Whether a title with this ID exists
    pub async fn exists(&self, id: i64) -> DatabaseResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM titles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Create a title together with its genre links
    pub async fn create(&self, title: &CreateTitle) -> ApiResult<TitleResponse> {
        info!("Creating title: {}", title.name);

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let category_id = match non_blank(&title.category) {
            Some(slug) => Some(resolve_category(&mut tx, slug).await?),
            None => None,
        };
        let genre_ids = resolve_genres(&mut tx, &title.genre).await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO titles (name, year, description, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&title.name)
        .bind(title.year)
        .bind(&title.description)
        .bind(category_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        link_genres(&mut tx, id, &genre_ids).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        self.find(id).await?.ok_or(ApiError::InternalServerError)
    }

    /// Apply a partial update; `Ok(None)` when the title does not exist
    pub async fn update(&self, id: i64, update: &UpdateTitle) -> ApiResult<Option<TitleResponse>> {
        info!("Updating title: {}", id);

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM titles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DatabaseError::from)?;
        if locked.is_none() {
            return Ok(None);
        }

        let category_id = match &update.category {
            None => None,
            Some(None) => Some(None),
            Some(Some(slug)) => Some(Some(resolve_category(&mut tx, slug).await?)),
        };

        sqlx::query(
            r#"
            UPDATE titles
            SET name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = CASE WHEN $5 THEN $6 ELSE category_id END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(update.year)
        .bind(&update.description)
        .bind(category_id.is_some())
        .bind(category_id.flatten())
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        if let Some(genre) = &update.genre {
            let genre_ids = resolve_genres(&mut tx, genre).await?;
            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(DatabaseError::from)?;
            link_genres(&mut tx, id, &genre_ids).await?;
        }

        tx.commit().await.map_err(DatabaseError::from)?;

        Ok(self.find(id).await?)
    }

    /// Delete a title; reviews and comments go with it
    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        info!("Deleting title: {}", id);

        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn attach_genres(&self, rows: Vec<TitleRow>) -> DatabaseResult<Vec<TitleResponse>> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let links: Vec<(i64, String, String)> = sqlx::query_as(
            r#"
            SELECT tg.title_id, g.name, g.slug
            FROM title_genres tg
            JOIN genres g ON g.id = tg.genre_id
            WHERE tg.title_id = ANY($1)
            ORDER BY g.name, g.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_title: HashMap<i64, Vec<CatalogEntry>> = HashMap::new();
        for (title_id, name, slug) in links {
            by_title
                .entry(title_id)
                .or_default()
                .push(CatalogEntry { name, slug });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let genre = by_title.remove(&row.id).unwrap_or_default();
                TitleResponse::from_row(row, genre)
            })
            .collect())
    }
}

async fn resolve_category(tx: &mut Transaction<'_, Postgres>, slug: &str) -> ApiResult<i64> {
    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&mut **tx)
        .await
        .map_err(DatabaseError::from)?;

    id.ok_or_else(|| {
        FieldError::new("category", format!("Category '{slug}' does not exist")).into()
    })
}

async fn resolve_genres(tx: &mut Transaction<'_, Postgres>, slugs: &[String]) -> ApiResult<Vec<i64>> {
    let mut wanted: Vec<String> = slugs.iter().map(|s| s.trim().to_string()).collect();
    wanted.sort();
    wanted.dedup();

    let found: Vec<(i64, String)> = sqlx::query_as("SELECT id, slug FROM genres WHERE slug = ANY($1)")
        .bind(&wanted)
        .fetch_all(&mut **tx)
        .await
        .map_err(DatabaseError::from)?;

    if let Some(missing) = wanted
        .iter()
        .find(|slug| !found.iter().any(|(_, found_slug)| found_slug == *slug))
    {
        return Err(FieldError::new("genre", format!("Genre '{missing}' does not exist")).into());
    }

    Ok(found.into_iter().map(|(id, _)| id).collect())
}

async fn link_genres(
    tx: &mut Transaction<'_, Postgres>,
    title_id: i64,
    genre_ids: &[i64],
) -> DatabaseResult<()> {
    sqlx::query(
        "INSERT INTO title_genres (title_id, genre_id) SELECT $1, UNNEST($2::bigint[])",
    )
    .bind(title_id)
    .bind(genre_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
