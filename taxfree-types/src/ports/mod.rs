//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod exchange;
mod storage;

pub use exchange::ExchangeRateProvider;
pub use storage::{CART_KEY, KeyValueStore, LANGUAGE_KEY, SETTINGS_KEY};
