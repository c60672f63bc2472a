//! Exchange Rates Library with a Fallback Provider Chain
//!
//! Rates come from an ordered list of providers tried one after another.
//! The default chain is:
//!
//! 1. [`LatestRatesProvider`] - latest rates quoted against the requested base
//! 2. [`UsdPivotProvider`] - a USD quote from the same service, re-based
//! 3. [`StaticRateProvider`] - a hardcoded table that always answers
//!
//! [`RateResolver::resolve`] never fails: whatever the network does, the
//! caller gets a rate table back.
//!
//! # Example
//! ```no_run
//! # async fn run() -> Result<(), taxfree_types::ExchangeError> {
//! use exchange_rates::RateResolver;
//!
//! let resolver = RateResolver::standard("https://api.frankfurter.app", std::time::Duration::from_secs(10))?;
//! let rates = resolver.resolve("JPY").await;
//! println!("1 JPY = {:?} TRY", rates.rate("TRY"));
//! # Ok(())
//! # }
//! ```

mod fixed;
mod http;
mod resolver;

pub use fixed::StaticRateProvider;
pub use http::{LatestRatesProvider, RatesApiClient, UsdPivotProvider};
pub use resolver::RateResolver;

/// Default rate service.
pub const DEFAULT_API_URL: &str = "https://api.frankfurter.app";
