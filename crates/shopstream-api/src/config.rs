//! Process configuration read from the environment.

use std::str::FromStr;

use shopstream_aggregation::domain::settings::AggregationSettings;

use crate::error::AppError;

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Maximum pooled connections.
    pub pool_max: u32,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Validated aggregation timing.
    pub aggregation: AggregationSettings,
    /// Whether the aggregation timer runs in this process.
    pub aggregation_enabled: bool,
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        _ => Ok(default),
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("EVENTS_DB_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config("EVENTS_DB_URL or DATABASE_URL must be set".to_owned())
            })?;

        let pool_max: u32 = parsed(&lookup, "EVENTS_DB_POOL_MAX", 10)?;
        if pool_max == 0 {
            return Err(AppError::Config(
                "EVENTS_DB_POOL_MAX must be at least 1".to_owned(),
            ));
        }

        let aggregation = AggregationSettings::new(
            parsed(&lookup, "ANALYTICS_AGGREGATION_FIXED_DELAY_MS", 60_000)?,
            parsed(&lookup, "ANALYTICS_AGGREGATION_LAG_SECONDS", 30)?,
            parsed(&lookup, "ANALYTICS_AGGREGATION_LOOKBACK_HOURS", 6)?,
        )
        .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            database_url,
            pool_max,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parsed(&lookup, "PORT", 3000)?,
            aggregation,
            aggregation_enabled: parsed(&lookup, "ANALYTICS_AGGREGATION_ENABLED", true)?,
        })
    }
}
