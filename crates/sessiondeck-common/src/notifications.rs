use serde::{Deserialize, Serialize};

/// Severity level for toasts and layout status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A short-lived, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: NotificationLevel,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_level() {
        assert_eq!(Toast::info("a").level, NotificationLevel::Info);
        assert_eq!(Toast::success("b").level, NotificationLevel::Success);
        assert!(Toast::error("c").is_error());
        assert!(!Toast::info("d").is_error());
    }

    #[test]
    fn level_serializes_lowercase() {
        let json = serde_json::to_string(&NotificationLevel::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
