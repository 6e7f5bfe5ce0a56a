//! In-memory layout store.

use async_trait::async_trait;
use chrono::Utc;
use sessiondeck_common::StoreError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{LayoutBook, LayoutStore};
use crate::model::{TabLayout, TabLayoutInput};

/// Keeps layouts for the lifetime of the process. Used for dry runs and
/// tests.
#[derive(Default)]
pub struct MemoryLayoutStore {
    book: Mutex<LayoutBook>,
    pending: Mutex<Option<TabLayout>>,
    writes: AtomicUsize,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layouts(layouts: Vec<TabLayout>) -> Self {
        Self {
            book: Mutex::new(LayoutBook::new(layouts)),
            ..Self::default()
        }
    }

    /// Number of successful saves, renames and deletes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn with_book<T>(&self, f: impl FnOnce(&mut LayoutBook) -> T) -> T {
        f(&mut self.book.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
impl LayoutStore for MemoryLayoutStore {
    async fn list(&self) -> Result<Vec<TabLayout>, StoreError> {
        Ok(self.with_book(|book| book.layouts().to_vec()))
    }

    async fn get(&self, id: &str) -> Result<Option<TabLayout>, StoreError> {
        Ok(self.with_book(|book| book.get(id).cloned()))
    }

    async fn save(&self, input: TabLayoutInput) -> Result<TabLayout, StoreError> {
        let saved = self.with_book(|book| book.upsert(input, Utc::now()))?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(saved)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.with_book(|book| book.remove(id));
        if removed {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }

    async fn rename(&self, id: &str, name: &str) -> Result<TabLayout, StoreError> {
        let renamed = self.with_book(|book| book.rename(id, name, Utc::now()))?;
        self.writes.fetch_add(1, Ordering::SeqCst);
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
