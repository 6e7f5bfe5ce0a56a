//! Storage and logging configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where layout documents live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the layouts JSON file. Defaults to the platform data dir.
    pub layouts_file: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `--log-level` nor `RUST_LOG` is set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
