//! JSON file layout store.
//!
//! All layouts live in one JSON array. Writes go to a `.tmp` sibling first
//! and are renamed over the real file.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sessiondeck_common::StoreError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

use super::{LayoutBook, LayoutStore};
use crate::model::{TabLayout, TabLayoutInput};

pub const LAYOUTS_FILE_NAME: &str = "tabLayouts.json";

/// `<data_dir>/sessiondeck/tabLayouts.json`
pub fn default_layouts_path() -> Result<PathBuf, StoreError> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        StoreError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "could not determine data directory",
        ))
    })?;
    Ok(data_dir.join("sessiondeck").join(LAYOUTS_FILE_NAME))
}

pub struct JsonLayoutStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: tokio::sync::Mutex<()>,
    pending: Mutex<Option<TabLayout>>,
}

impl JsonLayoutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
            pending: Mutex::new(None),
        }
    }

    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::new(default_layouts_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_book(&self) -> Result<LayoutBook, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LayoutBook::default()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(LayoutBook::default());
        }

        let Value::Array(entries) = serde_json::from_str::<Value>(&content)? else {
            warn!(path = %self.path.display(), "layouts file is not an array, ignoring");
            return Ok(LayoutBook::default());
        };
        Ok(LayoutBook::new(
            entries.into_iter().filter_map(TabLayout::from_value).collect(),
        ))
    }

    async fn write_book(&self, book: &LayoutBook) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(book.layouts())?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            warn!("atomic rename failed ({e}), falling back to direct write");
            tokio::fs::write(&self.path, &json).await?;
        }

        debug!(path = %self.path.display(), count = book.layouts().len(), "layouts written");
        Ok(())
    }
}

#[async_trait]
impl LayoutStore for JsonLayoutStore {
    async fn list(&self) -> Result<Vec<TabLayout>, StoreError> {
        Ok(self.read_book().await?.into_layouts())
    }

    async fn get(&self, id: &str) -> Result<Option<TabLayout>, StoreError> {
        Ok(self.read_book().await?.get(id).cloned())
    }

    async fn save(&self, input: TabLayoutInput) -> Result<TabLayout, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut book = self.read_book().await?;
        let saved = book.upsert(input, Utc::now())?;
        self.write_book(&book).await?;
        info!(layout_id = %saved.id, tabs = saved.tabs.len(), "layout saved");
        Ok(saved)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut book = self.read_book().await?;
        if !book.remove(id) {
            return Ok(false);
        }
        self.write_book(&book).await?;
        info!(layout_id = %id, "layout deleted");
        Ok(true)
    }

    async fn rename(&self, id: &str, name: &str) -> Result<TabLayout, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut book = self.read_book().await?;
        let renamed = book.rename(id, name, Utc::now())?;
        self.write_book(&book).await?;
        info!(layout_id = %id, "layout renamed");
        Ok(renamed)
    }

    async fn take_pending(&self) -> Option<TabLayout> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    async fn set_pending(&self, layout: TabLayout) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(layout);
    }
}
