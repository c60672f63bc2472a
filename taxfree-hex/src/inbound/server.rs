//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use taxfree_types::KeyValueStore;

use super::handlers::{self, AppState};
use crate::ShoppingService;

/// HTTP Server for the shopping API.
pub struct HttpServer<S: KeyValueStore> {
    state: Arc<AppState<S>>,
}

impl<S: KeyValueStore> HttpServer<S> {
    pub fn new(service: ShoppingService<S>) -> Self {
        Self {
            state: Arc::new(AppState {
                service: Mutex::new(service),
            }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/countries", get(handlers::countries))
            .route("/api/categories", get(handlers::categories))
            .route(
                "/api/settings",
                get(handlers::get_settings::<S>).put(handlers::update_settings::<S>),
            )
            .route("/api/rates", get(handlers::get_rates::<S>))
            .route("/api/rates/refresh", post(handlers::refresh_rates::<S>))
            .route("/api/quote", get(handlers::quote::<S>))
            .route(
                "/api/cart",
                get(handlers::list_cart::<S>)
                    .post(handlers::add_to_cart::<S>)
                    .delete(handlers::clear_cart::<S>),
            )
            .route("/api/cart/totals", get(handlers::cart_totals::<S>))
            .route("/api/cart/categories", get(handlers::cart_categories::<S>))
            .route("/api/cart/{id}", delete(handlers::remove_item::<S>))
            .route("/api/analytics/daily", get(handlers::daily_totals::<S>))
            .route("/api/i18n/{lang}/{key}", get(handlers::translate))
            .route("/api/language", put(handlers::set_language::<S>))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
