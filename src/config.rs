//! # Planner Configuration Module
//!
//! Settings are read from the environment, after loading a `.env` file when
//! one is present. Every setting has a default.
//!
//! | Variable | Default |
//! |---|---|
//! | `EXTRACTION_SERVICE_URL` | `http://localhost:8000` |
//! | `EXTRACTION_TIMEOUT_SECS` | `30` |
//! | `EXTRACTION_MAX_RETRIES` | `3` |
//! | `MADPLAN_LANGUAGE` | `da` |
//! | `DEFAULT_SERVINGS` | `4` |
//! | `MESSAGE_CLEAR_SECS` | `5` |
//! | `SEATS_PER_TABLE` | `8` |
//! | `PRICE_PER_PORTION` | `40` |

use anyhow::{Context, Result};
use chrono::Duration;
use std::env;
use std::str::FromStr;

use crate::export::ExportSettings;
use crate::extraction_config::ExtractionConfig;
use crate::localization::Language;

pub const DEFAULT_SERVINGS: u32 = 4;
pub const DEFAULT_MESSAGE_CLEAR_SECS: i64 = 5;

/// Top-level configuration for the planner and CLI
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub extraction: ExtractionConfig,
    pub language: Language,
    /// Servings assumed for recipes whose source does not state any
    pub default_servings: u32,
    /// How long a transient day message stays visible
    pub message_ttl: Duration,
    pub export: ExportSettings,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            language: Language::default(),
            default_servings: DEFAULT_SERVINGS,
            message_ttl: Duration::seconds(DEFAULT_MESSAGE_CLEAR_SECS),
            export: ExportSettings::default(),
        }
    }
}

impl PlannerConfig {
    /// Load `.env` and read the configuration from the environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("EXTRACTION_SERVICE_URL") {
            config.extraction.service_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = parse_var(&lookup, "EXTRACTION_TIMEOUT_SECS")? {
            config.extraction.recovery.operation_timeout_secs = secs;
        }
        if let Some(retries) = parse_var(&lookup, "EXTRACTION_MAX_RETRIES")? {
            config.extraction.recovery.max_retries = retries;
        }
        if let Some(language) = parse_var(&lookup, "MADPLAN_LANGUAGE")? {
            config.language = language;
        }
        if let Some(servings) = parse_var(&lookup, "DEFAULT_SERVINGS")? {
            config.default_servings = servings;
        }
        if let Some(secs) = parse_var::<i64, _>(&lookup, "MESSAGE_CLEAR_SECS")? {
            config.message_ttl = Duration::seconds(secs.max(0));
        }
        if let Some(seats) = parse_var::<u32, _>(&lookup, "SEATS_PER_TABLE")? {
            anyhow::ensure!(seats > 0, "SEATS_PER_TABLE must be at least 1");
            config.export.seats_per_table = seats;
        }
        if let Some(price) = parse_var::<f64, _>(&lookup, "PRICE_PER_PORTION")? {
            anyhow::ensure!(
                price.is_finite() && price >= 0.0,
                "PRICE_PER_PORTION must be a non-negative number"
            );
            config.export.price_per_portion = price;
        }

        tracing::debug!(
            service_url = %config.extraction.service_url,
            language = %config.language,
            default_servings = config.default_servings,
            "Loaded planner configuration"
        );

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .replace(',', ".")
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Invalid value '{}' for {}", raw, key)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<PlannerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PlannerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.default_servings, 4);
        assert_eq!(config.message_ttl, Duration::seconds(5));
        assert_eq!(config.language, Language::Danish);
        assert_eq!(config.extraction.recovery.max_retries, 3);
        assert_eq!(config.export.seats_per_table, 8);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("EXTRACTION_SERVICE_URL", "https://ocr.example/"),
            ("EXTRACTION_TIMEOUT_SECS", "10"),
            ("MADPLAN_LANGUAGE", "en"),
            ("DEFAULT_SERVINGS", "6"),
            ("PRICE_PER_PORTION", "32,5"),
        ])
        .unwrap();
        assert_eq!(config.extraction.service_url, "https://ocr.example");
        assert_eq!(config.extraction.recovery.operation_timeout_secs, 10);
        assert_eq!(config.language, Language::English);
        assert_eq!(config.default_servings, 6);
        assert_eq!(config.export.price_per_portion, 32.5);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = config_from(&[("DEFAULT_SERVINGS", "fire")]).unwrap_err();
        assert!(err.to_string().contains("DEFAULT_SERVINGS"));
        assert!(config_from(&[("SEATS_PER_TABLE", "0")]).is_err());
    }
}
