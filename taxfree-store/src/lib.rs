//! # Tax-Free Store
//!
//! Concrete storage implementations (adapters) for the tax-free calculator.
//! This crate provides adapters that implement the `KeyValueStore` port.

use async_trait::async_trait;
use taxfree_types::{KeyValueStore, StoreError};

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
#[cfg(test)]
mod sqlite_tests;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// URL selecting the in-memory store.
pub const MEMORY_URL: &str = "memory://";

/// Unified store wrapper chosen by URL.
pub enum Store {
    Memory(MemoryStore),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteStore),
}

/// Build and initialize a store from a URL.
///
/// This function:
/// 1. Picks the adapter from the URL scheme
/// 2. Connects and creates the table if needed
/// 3. Returns a ready-to-use `Store`
///
/// # Examples
///
/// ```ignore
/// let store = build_store("sqlite://taxfree.db?mode=rwc").await?;
/// let scratch = build_store("memory://").await?;
/// ```
pub async fn build_store(url: &str) -> anyhow::Result<Store> {
    if url.starts_with(MEMORY_URL) {
        tracing::info!("Using in-memory store; nothing will be persisted");
        return Ok(Store::Memory(MemoryStore::new()));
    }

    #[cfg(feature = "sqlite")]
    if url.starts_with("sqlite:") {
        return Ok(Store::Sqlite(SqliteStore::new(url).await?));
    }

    anyhow::bail!("Unsupported store URL: {}", url)
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement KeyValueStore for Store (delegation)
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl KeyValueStore for Store {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Store::Memory(inner) => inner.load(key).await,
            #[cfg(feature = "sqlite")]
            Store::Sqlite(inner) => inner.load(key).await,
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            Store::Memory(inner) => inner.save(key, value).await,
            #[cfg(feature = "sqlite")]
            Store::Sqlite(inner) => inner.save(key, value).await,
        }
    }
}
