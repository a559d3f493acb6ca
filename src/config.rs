//! Pipeline configuration
//!
//! Handlers usually run with [`PipelineConfig::default`]; services that want
//! quieter or more verbose pipelines load the config once at startup and
//! hand it to every [`crate::pipeline::PipelineBuilder`].

use crate::error::{StreelityError, StreelityResult};
use crate::logger::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name used in log lines and execution reports
    pub name: String,
    /// Measure per-stage durations; zero durations are reported when off
    pub record_timings: bool,
    /// Minimum level this pipeline logs at
    pub log_level: LogLevel,
    /// Dump the final field store at debug level after a successful run
    pub log_fields: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "request".to_string(),
            record_timings: true,
            log_level: LogLevel::Info,
            log_fields: false,
        }
    }
}

impl PipelineConfig {
    /// Parse a config from JSON text; missing keys fall back to defaults
    pub fn from_json(content: &str) -> StreelityResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| StreelityError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Load a config from a JSON file
    pub fn from_file(path: &Path) -> StreelityResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
