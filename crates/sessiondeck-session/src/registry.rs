//! Ordered list of open tabs.

use sessiondeck_common::NavDirection;

use crate::tab::Tab;

/// Open tabs in strip order. A profile appears at most once.
#[derive(Debug, Clone, Default)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn ids(&self) -> Vec<String> {
        self.tabs.iter().map(|t| t.profile_id.clone()).collect()
    }

    pub fn contains(&self, profile_id: &str) -> bool {
        self.index_of(profile_id).is_some()
    }

    pub fn index_of(&self, profile_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.profile_id == profile_id)
    }

    pub fn get(&self, profile_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.profile_id == profile_id)
    }

    pub fn get_mut(&mut self, profile_id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.profile_id == profile_id)
    }

    pub fn at(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    pub fn is_logged_out(&self, profile_id: &str) -> bool {
        self.get(profile_id).is_some_and(|t| t.logged_out)
    }

    pub fn logged_out_ids(&self) -> Vec<String> {
        self.tabs
            .iter()
            .filter(|t| t.logged_out)
            .map(|t| t.profile_id.clone())
            .collect()
    }

    /// Append a tab. Returns `false` if the profile is already open.
    pub fn push(&mut self, tab: Tab) -> bool {
        if self.contains(&tab.profile_id) {
            return false;
        }
        self.tabs.push(tab);
        true
    }

    /// Remove a tab, returning the index it held.
    pub fn remove(&mut self, profile_id: &str) -> Option<(usize, Tab)> {
        let idx = self.index_of(profile_id)?;
        Some((idx, self.tabs.remove(idx)))
    }

    pub fn clear(&mut self) -> Vec<Tab> {
        std::mem::take(&mut self.tabs)
    }

    /// Move `from_id` directly before (or after) `to_id`.
    ///
    /// No-op when either id is missing or both are the same tab.
    pub fn reorder(&mut self, from_id: &str, to_id: &str, after: bool) -> bool {
        if from_id == to_id {
            return false;
        }
        let (Some(from), Some(to)) = (self.index_of(from_id), self.index_of(to_id)) else {
            return false;
        };

        let tab = self.tabs.remove(from);
        let mut insert_at = if from < to { to - 1 } else { to };
        if after {
            insert_at += 1;
        }
        self.tabs.insert(insert_at, tab);
        from != insert_at
    }

    /// The tab before or after `profile_id`, wrapping at both ends.
    pub fn neighbor(&self, profile_id: &str, direction: NavDirection) -> Option<&str> {
        let len = self.tabs.len();
        let idx = self.index_of(profile_id)?;
        let next = match direction {
            NavDirection::Next => (idx + 1) % len,
            NavDirection::Prev => (idx + len - 1) % len,
        };
        Some(self.tabs[next].profile_id.as_str())
    }
}
