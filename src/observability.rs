//! Logging configuration and initialization shared by the CLI binaries.

use std::env;
use std::str::FromStr;

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LEVEL_ENV: &str = "DROUGHTFEAT_LOG_LEVEL";
const FORMAT_ENV: &str = "DROUGHTFEAT_LOG_FORMAT";
const TARGET_ENV: &str = "DROUGHTFEAT_LOG_TARGET";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    /// Resolves the config from `DROUGHTFEAT_LOG_*` env vars; unset or
    /// unparseable vars keep the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = env::var(LEVEL_ENV) {
            let trimmed = level.trim();
            if !trimmed.is_empty() {
                config.level = trimmed.to_string();
            }
        }
        if let Ok(format) = env::var(FORMAT_ENV) {
            if let Ok(parsed) = format.parse() {
                config.format = parsed;
            }
        }
        if let Ok(include_target) = env::var(TARGET_ENV) {
            if let Some(parsed) = parse_bool(&include_target) {
                config.include_target = parsed;
            }
        }

        config
    }
}

#[derive(Debug, Error)]
pub enum LoggingInitError {
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingInitError> {
    let env_filter =
        EnvFilter::try_new(config.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target)
        .with_ansi(matches!(config.format, LogFormat::Pretty));

    match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.pretty().finish())?,
    }

    Ok(())
}

pub fn log_app_start(app: &str, config: &LoggingConfig) {
    info!(
        component = app,
        event = "app.start",
        log_level = %config.level,
        log_format = ?config.format,
        include_target = config.include_target
    );
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
