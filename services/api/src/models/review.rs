//! Reviews and comments
//!
//! Both carry the same authored body, embedded as [`Authored`].

use chrono::{DateTime, Utc};
use common::validators::{FieldError, ScoreBounds, validate_score};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Text written by a user at a point in time
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Authored {
    pub text: String,
    #[serde(skip)]
    pub author_id: i64,
    /// Author username
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

/// Review entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub authored: Authored,
    pub score: i16,
}

/// Comment entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub authored: Authored,
}

fn validate_text(text: &str) -> Result<(), FieldError> {
    if text.trim().is_empty() {
        return Err(FieldError::new("text", "This field may not be blank"));
    }
    Ok(())
}

/// Request for review creation
#[derive(Debug, Deserialize)]
pub struct CreateReview {
    pub text: String,
    pub score: i16,
}

impl CreateReview {
    pub fn validate(&self, bounds: ScoreBounds) -> Result<(), FieldError> {
        validate_text(&self.text)?;
        validate_score(self.score, bounds)?;
        Ok(())
    }
}

/// Request for a partial review update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i16>,
}

impl UpdateReview {
    pub fn validate(&self, bounds: ScoreBounds) -> Result<(), FieldError> {
        if let Some(text) = &self.text {
            validate_text(text)?;
        }
        if let Some(score) = self.score {
            validate_score(score, bounds)?;
        }
        Ok(())
    }
}

/// Request for comment creation or update
#[derive(Debug, Deserialize)]
pub struct CommentText {
    pub text: String,
}

impl CommentText {
    pub fn validate(&self) -> Result<(), FieldError> {
        validate_text(&self.text)
    }
}
