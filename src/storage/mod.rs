// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Local key-value substrates backing the analysis history

pub mod file;
pub mod memory;
pub mod sqlite;

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::Result;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A string-to-string store with no transactions.
///
/// Reads return `Ok(None)` for absent keys; failed writes are errors.
pub trait KeyValueStore: Send + Sync {
    /// Name of this backend
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}

/// Open the backend selected in configuration
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(&config.path)?),
        StorageBackend::File => Arc::new(FileStore::open(Path::new(&config.path))?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!("Storage: {} ({})", store.name(), config.path);
    Ok(store)
}
