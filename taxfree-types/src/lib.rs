//! # Tax-Free Types
//!
//! Domain types and port traits for the tax-free shopping calculator.
//! This crate has ZERO external IO dependencies - only data structures,
//! pricing rules, static catalogs and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Country, Category, Settings, CartItem, RateTable)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types
//! - `i18n/` - Translation tables and dotted-key lookup

pub mod domain;
pub mod dto;
pub mod error;
pub mod i18n;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Cart, CartFilter, CartItem, CartItemId, CartTotals, Category, CategorySummary, ConvertedPrice,
    Country, CountryGroup, DailyTotal, NewCartItem, PriceQuote, RateSource, RateTable,
    SelectedCountries, Settings, TotalAmount,
};
pub use dto::*;
pub use error::{AppError, DomainError, ExchangeError, StoreError};
pub use i18n::{Language, Translator};
pub use ports::{ExchangeRateProvider, KeyValueStore};
