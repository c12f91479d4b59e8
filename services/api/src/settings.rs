//! API service settings
//!
//! Defaults can be overridden with `YAMDB__*` environment variables, for
//! example `YAMDB__SCORE_MAX=5` or `YAMDB__MIN_YEAR=1888`.

use common::validators::ScoreBounds;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// API service settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Socket address the HTTP server binds to
    pub bind_address: String,
    /// Lowest accepted review score
    pub score_min: i16,
    /// Highest accepted review score
    pub score_max: i16,
    /// Earliest accepted title year
    pub min_year: i32,
}

impl Settings {
    /// Load settings from defaults and `YAMDB__*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("bind_address", "0.0.0.0:3001")?
            .set_default("score_min", 1_i64)?
            .set_default("score_max", 10_i64)?
            .set_default("min_year", 0_i64)?
            .add_source(
                Environment::with_prefix("YAMDB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if settings.score_min > settings.score_max {
            return Err(ConfigError::Message(format!(
                "score_min ({}) exceeds score_max ({})",
                settings.score_min, settings.score_max
            )));
        }

        Ok(settings)
    }

    pub fn score_bounds(&self) -> ScoreBounds {
        ScoreBounds {
            min: self.score_min,
            max: self.score_max,
        }
    }
}
