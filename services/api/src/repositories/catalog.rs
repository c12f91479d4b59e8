//! Category and genre repository

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::{
    catalog::{CatalogEntry, CatalogKind, CreateCatalogEntry},
    listing::{ListQuery, like_pattern},
};

/// Repository over one of the two catalog tables
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
    kind: CatalogKind,
}

impl CatalogRepository {
    /// Create a new catalog repository
    pub fn new(pool: PgPool, kind: CatalogKind) -> Self {
        Self { pool, kind }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    /// List entries ordered by name, optionally filtered by name substring
    pub async fn list(&self, query: &ListQuery) -> DatabaseResult<(Vec<CatalogEntry>, i64)> {
        let page = query.page();
        let pattern = query.search().map(like_pattern);

        let sql = format!(
            r#"
            SELECT name, slug
            FROM {}
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            "#,
            self.kind.table()
        );
        let entries = sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(&pattern)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM {} WHERE ($1::text IS NULL OR name ILIKE $1)",
            self.kind.table()
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok((entries, total))
    }

    /// Insert a new entry; a taken slug surfaces as a unique violation
    pub async fn create(&self, entry: &CreateCatalogEntry) -> DatabaseResult<CatalogEntry> {
        info!("Creating {} {}", self.kind.label(), entry.slug);

        let sql = format!(
            "INSERT INTO {} (name, slug) VALUES ($1, $2) RETURNING name, slug",
            self.kind.table()
        );
        let created = sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(&entry.name)
            .bind(&entry.slug)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Delete an entry by slug, returning whether it existed
    pub async fn delete(&self, slug: &str) -> DatabaseResult<bool> {
        info!("Deleting {} {}", self.kind.label(), slug);

        let sql = format!("DELETE FROM {} WHERE slug = $1", self.kind.table());
        let result = sqlx::query(&sql).bind(slug).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }
}
