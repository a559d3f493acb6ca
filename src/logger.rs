//! Log output for pipelines
//!
//! Nothing is buffered here: each entry is handed straight to `tracing`,
//! so request data only ends up wherever the embedding service's
//! subscriber sends it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Log level enum for type-safe logging
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Emit `message` at `level`, dropping it when below `min_level`
pub fn log(min_level: LogLevel, level: LogLevel, source: &str, message: &str) {
    if level < min_level {
        return;
    }

    match level {
        LogLevel::Error => tracing::error!(source, "{}", message),
        LogLevel::Warn => tracing::warn!(source, "{}", message),
        LogLevel::Info => tracing::info!(source, "{}", message),
        LogLevel::Debug => tracing::debug!(source, "{}", message),
    }
}

/// Same as [`log`], with structured context rendered as a JSON field
pub fn log_with_context(
    min_level: LogLevel,
    level: LogLevel,
    source: &str,
    message: &str,
    context: &HashMap<String, serde_json::Value>,
) {
    if level < min_level {
        return;
    }

    let context = serde_json::to_string(context).unwrap_or_default();
    match level {
        LogLevel::Error => tracing::error!(source, context = %context, "{}", message),
        LogLevel::Warn => tracing::warn!(source, context = %context, "{}", message),
        LogLevel::Info => tracing::info!(source, context = %context, "{}", message),
        LogLevel::Debug => tracing::debug!(source, context = %context, "{}", message),
    }
}
