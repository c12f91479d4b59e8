//! Titles and their derived rating

use chrono::{Datelike, Utc};
use common::validators::{
    CHAR_FIELD_MAX_LENGTH, FieldError, validate_length, validate_max_year_against,
    validate_min_year,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use super::{catalog::CatalogEntry, nullable};

/// Mean review score of a title, `null` when nobody reviewed it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Rating(pub Option<f64>);

impl Rating {
    pub fn mean(scores: &[i16]) -> Self {
        if scores.is_empty() {
            return Rating(None);
        }
        let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
        Rating(Some(sum as f64 / scores.len() as f64))
    }
}

/// Title row joined with its category and review scores
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub description: String,
    pub scores: Vec<i16>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
}

/// Title as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub rating: Rating,
    pub description: String,
    pub genre: Vec<CatalogEntry>,
    pub category: Option<CatalogEntry>,
}

impl TitleResponse {
    pub fn from_row(row: TitleRow, genre: Vec<CatalogEntry>) -> Self {
        let category = match (row.category_name, row.category_slug) {
            (Some(name), Some(slug)) => Some(CatalogEntry { name, slug }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            rating: Rating::mean(&row.scores),
            description: row.description,
            genre,
            category,
        }
    }
}

/// Year bounds a title must respect at write time
#[derive(Debug, Clone, Copy)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    /// Bounds from the configured minimum up to the current calendar year
    pub fn up_to_now(min: i32) -> Self {
        Self {
            min,
            max: Utc::now().year(),
        }
    }

    fn check(&self, year: i32) -> Result<i32, FieldError> {
        validate_max_year_against(year, self.max)?;
        validate_min_year(year, self.min)
    }
}

/// Request for title creation
#[derive(Debug, Deserialize)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

impl CreateTitle {
    pub fn validate(&self, years: YearBounds) -> Result<(), FieldError> {
        validate_length("name", &self.name, CHAR_FIELD_MAX_LENGTH)?;
        years.check(self.year)?;
        validate_genres(&self.genre)
    }
}

/// Request for a partial title update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    pub genre: Option<Vec<String>>,
}

impl UpdateTitle {
    pub fn validate(&self, years: YearBounds) -> Result<(), FieldError> {
        if let Some(name) = &self.name {
            validate_length("name", name, CHAR_FIELD_MAX_LENGTH)?;
        }
        if let Some(year) = self.year {
            years.check(year)?;
        }
        if let Some(genre) = &self.genre {
            validate_genres(genre)?;
        }
        Ok(())
    }
}

fn validate_genres(genre: &[String]) -> Result<(), FieldError> {
    if genre.is_empty() {
        return Err(FieldError::new("genre", "At least one genre is required"));
    }
    Ok(())
}

/// Sort orders accepted by the title listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleOrdering {
    #[default]
    Name,
    NameDesc,
    Year,
    YearDesc,
    Rating,
    RatingDesc,
}

impl TitleOrdering {
    /// ORDER BY clause over the `t` alias; ties break on id
    pub fn sql(&self) -> &'static str {
        match self {
            TitleOrdering::Name => "t.name ASC, t.id ASC",
            TitleOrdering::NameDesc => "t.name DESC, t.id ASC",
            TitleOrdering::Year => "t.year ASC, t.id ASC",
            TitleOrdering::YearDesc => "t.year DESC, t.id ASC",
            TitleOrdering::Rating => "rating ASC NULLS LAST, t.id ASC",
            TitleOrdering::RatingDesc => "rating DESC NULLS LAST, t.id ASC",
        }
    }
}

impl FromStr for TitleOrdering {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(TitleOrdering::Name),
            "-name" => Ok(TitleOrdering::NameDesc),
            "year" => Ok(TitleOrdering::Year),
            "-year" => Ok(TitleOrdering::YearDesc),
            "rating" => Ok(TitleOrdering::Rating),
            "-rating" => Ok(TitleOrdering::RatingDesc),
            other => Err(FieldError::new(
                "ordering",
                format!("Unknown ordering '{other}'"),
            )),
        }
    }
}

/// Query parameters for the title listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleQuery {
    /// Category slug
    pub category: Option<String>,
    /// Genre slug
    pub genre: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub year: Option<i32>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TitleQuery {
    pub fn ordering(&self) -> Result<TitleOrdering, FieldError> {
        match self.ordering.as_deref() {
            None | Some("") => Ok(TitleOrdering::default()),
            Some(value) => value.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(year: i32) -> CreateTitle {
        CreateTitle {
            name: "Dune".to_string(),
            year,
            description: String::new(),
            category: Some("book".to_string()),
            genre: vec!["sci-fi".to_string()],
        }
    }

    #[test]
    fn rating_is_the_mean_score() {
        assert_eq!(Rating::mean(&[8, 10]), Rating(Some(9.0)));
        assert_eq!(Rating::mean(&[1, 2]), Rating(Some(1.5)));
        assert_eq!(Rating::mean(&[]), Rating(None));
    }

    #[test]
    fn rating_serializes_as_number_or_null() {
        assert_eq!(serde_json::to_value(Rating(None)).unwrap(), serde_json::Value::Null);
        assert_eq!(serde_json::to_value(Rating(Some(9.0))).unwrap(), serde_json::json!(9.0));
    }

    #[test]
    fn future_year_is_rejected() {
        let years = YearBounds { min: 0, max: 2024 };
        assert_eq!(create(2025).validate(years).unwrap_err().field, "year");
        assert!(create(2024).validate(years).is_ok());
    }

    #[test]
    fn configured_minimum_year_is_accepted() {
        let years = YearBounds { min: 1888, max: 2024 };
        assert!(create(1888).validate(years).is_ok());
        assert_eq!(create(1887).validate(years).unwrap_err().field, "year");
    }

    #[test]
    fn current_year_bound_tracks_the_clock() {
        let years = YearBounds::up_to_now(0);
        let this_year = Utc::now().year();
        assert!(create(this_year).validate(years).is_ok());
        assert!(create(this_year + 1).validate(years).is_err());
    }

    #[test]
    fn title_needs_a_genre() {
        let mut title = create(2000);
        title.genre.clear();
        let years = YearBounds { min: 0, max: 2024 };
        assert_eq!(title.validate(years).unwrap_err().field, "genre");
    }

    #[test]
    fn update_distinguishes_null_category_from_absent() {
        let absent: UpdateTitle = serde_json::from_str(r#"{"name": "Dune"}"#).unwrap();
        assert_eq!(absent.category, None);

        let cleared: UpdateTitle = serde_json::from_str(r#"{"category": null}"#).unwrap();
        assert_eq!(cleared.category, Some(None));

        let set: UpdateTitle = serde_json::from_str(r#"{"category": "film"}"#).unwrap();
        assert_eq!(set.category, Some(Some("film".to_string())));
    }

    #[test]
    fn ordering_whitelist() {
        let query = |ordering: &str| TitleQuery {
            ordering: Some(ordering.to_string()),
            ..Default::default()
        };
        assert_eq!(query("-rating").ordering().unwrap(), TitleOrdering::RatingDesc);
        assert_eq!(query("year").ordering().unwrap(), TitleOrdering::Year);
        assert_eq!(TitleQuery::default().ordering().unwrap(), TitleOrdering::Name);
        assert_eq!(query("id; DROP TABLE titles").ordering().unwrap_err().field, "ordering");
    }
}
