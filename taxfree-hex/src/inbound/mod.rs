//! HTTP Inbound Adapter
//!
//! Axum-based JSON API over the shopping service.

mod handlers;
mod server;

pub use handlers::{ApiError, AppState};
pub use server::HttpServer;
