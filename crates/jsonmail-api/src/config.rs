//! API boundary configuration.
//!
//! Selects the serialization strategy, the timestamp format, whether
//! internal failure details reach clients, and the log output. Defaults
//! favour JSON:API output with internal details hidden. Override via
//! environment variables or explicit construction.

use std::sync::Arc;

use jsonmail_core::JsonStrategy;
use thiserror::Error;

use crate::error::ErrorRenderer;
use crate::strategy::{FlatJsonStrategy, JsonApiStrategy, TimestampFormat};

pub const ENV_STRATEGY: &str = "JSONMAIL_STRATEGY";
pub const ENV_TIMESTAMP_FORMAT: &str = "JSONMAIL_TIMESTAMP_FORMAT";
pub const ENV_EXPOSE_INTERNAL_ERRORS: &str = "JSONMAIL_EXPOSE_INTERNAL_ERRORS";
pub const ENV_LOG_FORMAT: &str = "JSONMAIL_LOG_FORMAT";
pub const ENV_LOG_LEVEL: &str = "JSONMAIL_LOG_LEVEL";

/// Errors loading [`ApiConfig`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held a value outside its allowed set.
    #[error("invalid value {value:?} for {var}: expected {expected}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A timestamp pattern contained an unknown `strftime` specifier.
    #[error("invalid timestamp pattern {0:?}")]
    InvalidTimestampPattern(String),
}

/// Which API surface response bodies are rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    JsonApi,
    Flat,
}

/// Log line encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub strategy: StrategyKind,
    pub timestamps: TimestampFormat,
    /// Include failure messages in 500-class response bodies.
    pub expose_internal_details: bool,
    pub log_format: LogFormat,
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            timestamps: TimestampFormat::default(),
            expose_internal_details: false,
            log_format: LogFormat::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `JSONMAIL_STRATEGY` — `jsonapi` (default) or `flat`
    /// - `JSONMAIL_TIMESTAMP_FORMAT` — `rfc3339` (default), `unix`, or a `strftime` pattern
    /// - `JSONMAIL_EXPOSE_INTERNAL_ERRORS` — `true`/`false`/`1`/`0` (default: false)
    /// - `JSONMAIL_LOG_FORMAT` — `text` (default) or `json`
    /// - `JSONMAIL_LOG_LEVEL` — filter directive (default: `info`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let strategy = match lookup(ENV_STRATEGY).as_deref().map(str::trim) {
            None | Some("") => defaults.strategy,
            Some(v) if v.eq_ignore_ascii_case("jsonapi") => StrategyKind::JsonApi,
            Some(v) if v.eq_ignore_ascii_case("flat") => StrategyKind::Flat,
            Some(v) => return Err(invalid(ENV_STRATEGY, v, "jsonapi|flat")),
        };

        let timestamps = match lookup(ENV_TIMESTAMP_FORMAT) {
            Some(v) if !v.trim().is_empty() => TimestampFormat::parse(&v)?,
            _ => defaults.timestamps,
        };

        let expose_internal_details = match lookup(ENV_EXPOSE_INTERNAL_ERRORS).as_deref().map(str::trim) {
            None | Some("") => defaults.expose_internal_details,
            Some("1") => true,
            Some("0") => false,
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            Some(v) => return Err(invalid(ENV_EXPOSE_INTERNAL_ERRORS, v, "true|false|1|0")),
        };

        let log_format = match lookup(ENV_LOG_FORMAT).as_deref().map(str::trim) {
            None | Some("") => defaults.log_format,
            Some(v) if v.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(v) => return Err(invalid(ENV_LOG_FORMAT, v, "text|json")),
        };

        let log_level = lookup(ENV_LOG_LEVEL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.log_level);

        Ok(Self {
            strategy,
            timestamps,
            expose_internal_details,
            log_format,
            log_level,
        })
    }

    /// The configured serialization strategy.
    pub fn json_strategy(&self) -> Arc<dyn JsonStrategy> {
        match self.strategy {
            StrategyKind::JsonApi => Arc::new(JsonApiStrategy::new(self.timestamps.clone())),
            StrategyKind::Flat => Arc::new(FlatJsonStrategy::new(self.timestamps.clone())),
        }
    }

    /// An error renderer honouring this configuration.
    pub fn renderer(&self) -> ErrorRenderer {
        ErrorRenderer::new(self.json_strategy()).expose_internal_details(self.expose_internal_details)
    }
}

fn invalid(var: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        expected,
    }
}
