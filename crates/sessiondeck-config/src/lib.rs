//! SessionDeck configuration system.
//!
//! TOML-based configuration for layout pacing, debounce timings, window
//! chrome metrics, storage and logging. All sections use sensible defaults
//! so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sessiondeck_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{SessionDeckConfig, CONFIG_SCHEMA_VERSION};

use sessiondeck_common::ConfigError;
use std::path::Path;

/// Load config from `path`, or from the platform default path when `None`.
///
/// The default path gets a commented config file on first run.
pub fn load_config(path: Option<&Path>) -> Result<SessionDeckConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &SessionDeckConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
