//! HTTP rate providers backed by a Frankfurter-compatible service.
//!
//! The service answers `GET {base_url}/latest?from={CODE}` with
//! `{ "rates": { "<CODE>": <number>, ... } }`. The quoted base is not
//! listed in its own `rates` map.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use taxfree_types::{ExchangeError, ExchangeRateProvider, RateSource, RateTable};

const PIVOT: &str = "USD";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: HashMap<String, f64>,
}

/// Thin client for the `/latest` endpoint.
pub struct RatesApiClient {
    base_url: String,
    http: Client,
}

impl RatesApiClient {
    /// Creates a client with a request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ExchangeError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExchangeError::ServiceUnavailable(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the latest rates quoted against `from`.
    async fn latest(&self, from: &str) -> Result<HashMap<String, f64>, ExchangeError> {
        let resp = self
            .http
            .get(format!("{}/latest", self.base_url))
            .query(&[("from", from)])
            .send()
            .await
            .map_err(|e| ExchangeError::ServiceUnavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExchangeError::ServiceUnavailable(format!(
                "GET /latest?from={} returned {}",
                from, status
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ExchangeError::ServiceUnavailable(e.to_string()))?;
        let parsed: LatestResponse = serde_json::from_str(&body)
            .map_err(|e| ExchangeError::MalformedResponse(e.to_string()))?;
        Ok(parsed.rates)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Primary: rates quoted against the requested base
// ─────────────────────────────────────────────────────────────────────────────

pub struct LatestRatesProvider {
    client: Arc<RatesApiClient>,
}

impl LatestRatesProvider {
    pub fn new(client: Arc<RatesApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ExchangeRateProvider for LatestRatesProvider {
    fn name(&self) -> &'static str {
        "latest"
    }

    async fn latest(&self, base: &str) -> Result<RateTable, ExchangeError> {
        let rates = self.client.latest(base).await?;
        Ok(RateTable::new(base, rates, RateSource::Live))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Secondary: USD quote re-based onto the requested base
// ─────────────────────────────────────────────────────────────────────────────

/// Derives `rate[c] = usd[c] / usd[base]` from a USD-based quote.
///
/// With a JPY base this is the JPY pivot the calculator has always used as
/// its fallback.
pub struct UsdPivotProvider {
    client: Arc<RatesApiClient>,
}

impl UsdPivotProvider {
    pub fn new(client: Arc<RatesApiClient>) -> Self {
        Self { client }
    }
}

/// Re-bases a USD quote onto `base`. `None` when `base` is not quoted.
pub(crate) fn rebase_usd_quote(base: &str, mut usd: HashMap<String, f64>) -> Option<RateTable> {
    usd.insert(PIVOT.to_string(), 1.0);
    let base = base.to_uppercase();
    let pivot = usd.get(&base).copied().filter(|r| r.is_finite() && *r > 0.0)?;
    let rates = usd
        .into_iter()
        .filter(|(code, _)| code.to_uppercase() != base)
        .map(|(code, rate)| (code, rate / pivot));
    Some(RateTable::new(base.clone(), rates, RateSource::UsdPivot))
}

#[async_trait::async_trait]
impl ExchangeRateProvider for UsdPivotProvider {
    fn name(&self) -> &'static str {
        "usd-pivot"
    }

    async fn latest(&self, base: &str) -> Result<RateTable, ExchangeError> {
        let usd = self.client.latest(PIVOT).await?;
        rebase_usd_quote(base, usd).ok_or_else(|| ExchangeError::RateNotAvailable(base.to_string()))
    }
}
