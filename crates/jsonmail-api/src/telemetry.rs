//! Structured tracing setup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{ApiConfig, LogFormat};

/// Errors installing the global subscriber.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The configured filter directive did not parse.
    #[error("invalid log filter {directive:?}: {reason}")]
    Filter { directive: String, reason: String },

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Install a `tracing-subscriber` fmt subscriber.
///
/// `RUST_LOG` takes precedence over [`ApiConfig::log_level`]. A `RUST_LOG`
/// that does not parse is an error, not a silent fallback.
pub fn try_init(config: &ApiConfig) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = select_filter(rust_log.as_deref(), &config.log_level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.log_format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| TelemetryError::Install(e.to_string()))
}

fn select_filter(rust_log: Option<&str>, log_level: &str) -> Result<EnvFilter, TelemetryError> {
    match rust_log.map(str::trim) {
        Some(directive) if !directive.is_empty() => build_filter(directive),
        _ => build_filter(log_level),
    }
}

fn build_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|e| TelemetryError::Filter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}
