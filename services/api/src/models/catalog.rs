//! Categories and genres

use common::validators::{CHAR_FIELD_MAX_LENGTH, FieldError, validate_length, validate_slug};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Which catalog table an entry lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Category,
    Genre,
}

impl CatalogKind {
    pub fn table(&self) -> &'static str {
        match self {
            CatalogKind::Category => "categories",
            CatalogKind::Genre => "genres",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Category => "Category",
            CatalogKind::Genre => "Genre",
        }
    }
}

/// A category or genre as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CatalogEntry {
    pub name: String,
    pub slug: String,
}

/// Request for category or genre creation
#[derive(Debug, Deserialize)]
pub struct CreateCatalogEntry {
    pub name: String,
    pub slug: String,
}

impl CreateCatalogEntry {
    pub fn validate(&self) -> Result<(), FieldError> {
        validate_length("name", &self.name, CHAR_FIELD_MAX_LENGTH)?;
        validate_slug(&self.slug)?;
        Ok(())
    }
}
