//! Logging setup for the CLI.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//!
//! - `--log-format` / `LOG_FORMAT`: `text` (default) or `json`
//! - `RUST_LOG`: level filter (default: `info`)

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// "json" selects JSON; anything else falls back to text.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Configuration from `LOG_FORMAT`, overridden by `flag` when given.
    pub fn resolve(flag: Option<LogFormat>) -> Self {
        let format = flag.unwrap_or_else(|| {
            std::env::var("LOG_FORMAT")
                .map(|v| LogFormat::parse_lenient(&v))
                .unwrap_or_default()
        });
        Self {
            format,
            ..Self::default()
        }
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    let _ = match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parsing_is_lenient() {
        assert_eq!(LogFormat::parse_lenient("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse_lenient(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse_lenient("pretty"), LogFormat::Text);
        assert_eq!(LogFormat::parse_lenient("xml"), LogFormat::Text);
    }

    #[test]
    fn flag_overrides_environment() {
        let config = LoggingConfig::resolve(Some(LogFormat::Json));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
    }
}
