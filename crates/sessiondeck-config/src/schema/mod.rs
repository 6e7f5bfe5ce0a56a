//! Configuration schema types for SessionDeck.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod chrome;
mod layout;
mod system;
mod timing;

pub use chrome::*;
pub use layout::*;
pub use system::*;
pub use timing::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for SessionDeck.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDeckConfig {
    pub layout: LayoutConfig,
    pub timing: TimingConfig,
    pub chrome: ChromeConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}
