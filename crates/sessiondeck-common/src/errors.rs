use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by the process hosting the content surfaces.
///
/// These are transient from the engine's point of view: they are logged,
/// surfaced as a toast, and the surrounding operation carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("surface for {profile_id} failed to attach: {reason}")]
    AttachFailed { profile_id: String, reason: String },

    #[error("host rejected {command}: {reason}")]
    Rejected {
        command: &'static str,
        reason: String,
    },

    #[error("host unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("layout document error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid layout: {0}")]
    Invalid(String),

    #[error("layout not found: {0}")]
    NotFound(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("layout not found: {0}")]
    LayoutNotFound(String),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("no open tabs to save")]
    EmptySession,

    #[error("profile {0} is not open")]
    NotOpen(String),

    #[error("invalid profile id {0:?}")]
    InvalidProfile(String),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionDeckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
