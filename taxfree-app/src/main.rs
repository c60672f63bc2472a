//! # Tax-Free Shopping Server
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Open the key-value store
//! - Build the rate resolver and load the shopping service
//! - Start the HTTP server

mod config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_rates::RateResolver;
use taxfree_hex::{ShoppingService, inbound::HttpServer};
use taxfree_store::build_store;

fn init_tracing(json: bool) {
    let (json_layer, plain_layer) = if json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,taxfree_app=debug,taxfree_hex=debug".into()),
        )
        .with(json_layer)
        .with(plain_layer)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = config::Config::from_env()?;
    init_tracing(config.json_logs);

    tracing::info!("Starting tax-free server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);

    let store = build_store(&config.database_url).await?;
    let resolver = RateResolver::standard(&config.rates_api_url, config.rates_timeout)?;
    tracing::debug!(providers = ?resolver.provider_names(), "Rate providers ready");

    let service = ShoppingService::load(store, resolver).await;

    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    Ok(())
}
