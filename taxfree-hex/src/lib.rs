//! # Tax-Free Hex
//!
//! Application service layer and HTTP adapter for the tax-free calculator.
//!
//! ## Architecture
//!
//! - `service/` - Application service (owns settings, cart and session rates)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `S: KeyValueStore`, allowing
//! different storage implementations to be injected.

pub mod inbound;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::ShoppingService;
