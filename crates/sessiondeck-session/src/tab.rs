/// One open profile in the tab strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub profile_id: String,
    pub title: String,
    pub logged_out: bool,
}

impl Tab {
    pub fn new(profile_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            title: title.into(),
            logged_out: false,
        }
    }
}
