//! Pure create/update/rename/delete rules over a list of layouts.

use chrono::{DateTime, Utc};
use sessiondeck_common::{is_valid_name, new_id, StoreError, MAX_NAME_LENGTH};

use crate::model::{default_layout_name, timestamp, TabLayout, TabLayoutInput};

/// The full set of stored layouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutBook {
    layouts: Vec<TabLayout>,
}

impl LayoutBook {
    pub fn new(layouts: Vec<TabLayout>) -> Self {
        Self { layouts }
    }

    pub fn layouts(&self) -> &[TabLayout] {
        &self.layouts
    }

    pub fn into_layouts(self) -> Vec<TabLayout> {
        self.layouts
    }

    pub fn get(&self, id: &str) -> Option<&TabLayout> {
        self.layouts.iter().find(|l| l.id == id)
    }

    /// Insert or replace a layout.
    ///
    /// A known id keeps its `createdAt` (and its name when the input has
    /// none) and gets a fresh `updatedAt`. An unknown or absent id creates a
    /// new layout under a freshly generated id.
    pub fn upsert(&mut self, input: TabLayoutInput, now: DateTime<Utc>) -> Result<TabLayout, StoreError> {
        input.validate()?;
        let stamp = timestamp(now);
        let given_name = input.given_name().map(str::to_string);

        let existing = input
            .id
            .as_deref()
            .and_then(|id| self.layouts.iter().position(|l| l.id == id));

        match existing {
            Some(idx) => {
                let prev = &self.layouts[idx];
                let name = given_name.unwrap_or_else(|| prev.name.clone());
                let layout = input
                    .into_layout(prev.id.clone(), name, prev.created_at.clone(), stamp)
                    .ok_or_else(|| StoreError::Invalid("layout has no tabs".into()))?;
                self.layouts[idx] = layout.clone();
                Ok(layout)
            }
            None => {
                let name = given_name.unwrap_or_else(|| default_layout_name(now));
                let layout = input
                    .into_layout(new_id(), name, stamp.clone(), stamp)
                    .ok_or_else(|| StoreError::Invalid("layout has no tabs".into()))?;
                self.layouts.push(layout.clone());
                Ok(layout)
            }
        }
    }

    pub fn rename(&mut self, id: &str, name: &str, now: DateTime<Utc>) -> Result<TabLayout, StoreError> {
        let name = name.trim();
        if !is_valid_name(name) {
            return Err(StoreError::Invalid(format!(
                "layout name must be 1..={MAX_NAME_LENGTH} characters"
            )));
        }
        let layout = self
            .layouts
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        layout.name = name.to_string();
        layout.updated_at = timestamp(now);
        Ok(layout.clone())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.layouts.len();
        self.layouts.retain(|l| l.id != id);
        self.layouts.len() != before
    }
}
