//! Config loading from disk.

use crate::schema::SessionDeckConfig;
use crate::validation;
use sessiondeck_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. A config that fails validation
/// is logged and replaced by the default config.
pub fn load_from_path(path: &Path) -> Result<SessionDeckConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: SessionDeckConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(SessionDeckConfig::default());
    }

    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/sessiondeck/config.toml`
/// On macOS: `~/Library/Application Support/sessiondeck/config.toml`
///
/// If the file does not exist, a commented default file is written and the
/// defaults are returned.
pub fn load_default() -> Result<SessionDeckConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!(path = %path.display(), "no config found, creating default");
        create_default_config(&path)?;
        return Ok(SessionDeckConfig::default());
    }

    load_from_path(&path)
}
