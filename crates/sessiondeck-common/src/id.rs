/// Longest id accepted for layouts and profiles.
pub const MAX_ID_LENGTH: usize = 64;

/// Longest layout name accepted.
pub const MAX_NAME_LENGTH: usize = 256;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Ids are 1-64 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LENGTH
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().count() <= MAX_NAME_LENGTH
}
