//! In-memory row store.
//!
//! Backs the router tests and local development runs where no spreadsheet
//! is configured. Same contract as the Sheets store: append-only, raw
//! cells out.

use std::sync::Mutex;

use async_trait::async_trait;

use branchboard_core::RetailEntry;

use super::{RowStore, StoreError};

/// A `Vec`-backed [`RowStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Vec<String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with raw rows (header row excluded, as
    /// with the real store's data range).
    #[must_use]
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Snapshot of the stored raw rows.
    ///
    /// # Panics
    ///
    /// Panics if the interior lock is poisoned, which only happens after a
    /// panic in another test thread.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().expect("row store lock poisoned").clone()
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn append(&self, entry: &RetailEntry) -> Result<(), StoreError> {
        self.rows
            .lock()
            .expect("row store lock poisoned")
            .push(entry.to_row().to_vec());
        Ok(())
    }

    async fn read_rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.rows())
    }
}
