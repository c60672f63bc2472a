//! Durable key-value storage port.
//!
//! Each key holds one JSON document, read whole and overwritten whole.

use crate::error::StoreError;

/// Key of the settings document.
pub const SETTINGS_KEY: &str = "taxFreeSettings";
/// Key of the cart document (a JSON array of items).
pub const CART_KEY: &str = "shopping-cart";
/// Key of the selected UI language.
pub const LANGUAGE_KEY: &str = "language";

#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Reads the document stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the document stored under `key`.
    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
