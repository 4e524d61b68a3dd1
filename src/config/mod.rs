//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; every field has a default, so
//! an empty file is valid. A handful of engine knobs can be overridden from
//! the environment (a `.env` file is loaded by the binary first).
//!
//! # Example
//!
//! ```no_run
//! use rangearb::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

mod engine;
mod logging;

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

pub use engine::EngineConfig;
pub use logging::LoggingConfig;

use crate::error::{ConfigError, Result};

/// Overrides `engine.min_profit_bps`.
pub const ENV_MIN_PROFIT_BPS: &str = "RANGEARB_MIN_PROFIT_BPS";
/// Overrides `engine.cooldown_ms`.
pub const ENV_COOLDOWN_MS: &str = "RANGEARB_COOLDOWN_MS";
/// Overrides `engine.max_batch_size`.
pub const ENV_MAX_BATCH_SIZE: &str = "RANGEARB_MAX_BATCH_SIZE";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, an override does not parse,
    /// or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or
    /// [`parse_toml`](Self::parse_toml) fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = var(ENV_MIN_PROFIT_BPS) {
            self.engine.min_profit_bps = parse_override("min_profit_bps", &value)?;
        }
        if let Some(value) = var(ENV_COOLDOWN_MS) {
            self.engine.cooldown_ms = parse_override("cooldown_ms", &value)?;
        }
        if let Some(value) = var(ENV_MAX_BATCH_SIZE) {
            self.engine.max_batch_size = parse_override("max_batch_size", &value)?;
        }
        Ok(())
    }

    /// Check every field against its allowed range.
    ///
    /// Called by [`parse_toml`](Self::parse_toml); call it again after
    /// changing fields in code, e.g. from command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` or `MissingField` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let engine = &self.engine;
        if engine.min_profit_bps < 0 {
            return Err(invalid("min_profit_bps", "must be at least 0"));
        }
        if engine.cooldown_ms == 0 {
            return Err(invalid("cooldown_ms", "must be greater than 0"));
        }
        if engine.max_batch_size == 0 {
            return Err(invalid("max_batch_size", "must be at least 1"));
        }
        if engine.max_throttle_entries == 0 {
            return Err(invalid("max_throttle_entries", "must be at least 1"));
        }
        if engine.max_cost.is_some_and(|cost| cost <= Decimal::ZERO) {
            return Err(invalid("max_cost", "must be greater than 0"));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "level" }.into());
        }
        if !logging::FORMATS.contains(&self.logging.format.as_str()) {
            return Err(invalid(
                "format",
                format!("must be one of {}", logging::FORMATS.join(", ")),
            ));
        }
        Ok(())
    }

    /// Initialize the tracing subscriber.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn parse_override<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        ConfigError::InvalidValue {
            field,
            reason: format!("environment override {value:?}: {e}"),
        }
        .into()
    })
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::planner::LegPriority;
    use crate::error::Error;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn parse_without_env(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_without_env("").unwrap();
        assert_eq!(config.engine.max_batch_size, 15);
        assert_eq!(config.engine.leg_priority, LegPriority::ParentFirst);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.engine.max_cost.is_none());
    }

    #[test]
    fn test_full_file() {
        let config = parse_without_env(
            r#"
            [engine]
            min_profit_bps = 200
            cooldown_ms = 250
            max_batch_size = 10
            leg_priority = "evaluator"
            max_throttle_entries = 64
            max_cost = "500"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.min_profit_bps, 200);
        assert_eq!(config.engine.cooldown().as_millis(), 250);
        assert_eq!(config.engine.leg_priority, LegPriority::Evaluator);
        assert_eq!(config.engine.sizing().max_cost, Some(dec!(500)));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        let err = parse_without_env("[engine]\nmax_batch_size = 0").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "max_batch_size",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_negative_threshold() {
        assert!(parse_without_env("[engine]\nmin_profit_bps = -1").is_err());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let err = parse_without_env("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_MIN_PROFIT_BPS, "75"),
            (ENV_COOLDOWN_MS, "20"),
            (ENV_MAX_BATCH_SIZE, "5"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env_overrides(|key| env.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.engine.min_profit_bps, 75);
        assert_eq!(config.engine.cooldown_ms, 20);
        assert_eq!(config.engine.max_batch_size, 5);
    }

    #[test]
    fn test_bad_env_override() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(|key| (key == ENV_COOLDOWN_MS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "cooldown_ms",
                ..
            })
        ));
    }
}
