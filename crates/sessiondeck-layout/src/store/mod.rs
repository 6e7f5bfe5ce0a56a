//! Layout persistence.
//!
//! [`LayoutStore`] is the seam between the session engine and whatever
//! keeps layout documents. [`JsonLayoutStore`] writes a single JSON array
//! to disk; [`MemoryLayoutStore`] keeps everything in memory.

mod book;
mod json;
mod memory;


pub use book::LayoutBook;
pub use json::{default_layouts_path, JsonLayoutStore, LAYOUTS_FILE_NAME};
pub use memory::MemoryLayoutStore;

use async_trait::async_trait;
use sessiondeck_common::StoreError;

use crate::model::{TabLayout, TabLayoutInput};

#[async_trait]
pub trait LayoutStore: Send + Sync {
    /// All stored layouts, in stored order.
    async fn list(&self) -> Result<Vec<TabLayout>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<TabLayout>, StoreError>;

    /// Create or update a layout and return the stored document.
    async fn save(&self, input: TabLayoutInput) -> Result<TabLayout, StoreError>;

    /// Returns `false` when no layout had this id.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    async fn rename(&self, id: &str, name: &str) -> Result<TabLayout, StoreError>;

    /// Remove and return the layout queued for the next window start.
    async fn take_pending(&self) -> Option<TabLayout>;

    /// Queue a layout for the next window start, replacing any queued one.
    async fn set_pending(&self, layout: TabLayout);
}
