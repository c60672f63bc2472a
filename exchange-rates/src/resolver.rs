//! Ordered provider chain with an always-succeeding terminal table.

use std::sync::Arc;
use std::time::Duration;

use taxfree_types::{ExchangeError, ExchangeRateProvider, RateTable};

use crate::fixed::StaticRateProvider;
use crate::http::{LatestRatesProvider, RatesApiClient, UsdPivotProvider};

/// Tries each provider in order, one request at a time, and falls back to
/// the static table when all of them fail.
pub struct RateResolver {
    providers: Vec<Box<dyn ExchangeRateProvider>>,
    fallback: StaticRateProvider,
}

impl RateResolver {
    /// A resolver with no network providers: always the static table.
    pub fn offline() -> Self {
        Self {
            providers: Vec::new(),
            fallback: StaticRateProvider::new(),
        }
    }

    /// The standard chain: latest rates, then the USD pivot, both from `api_url`.
    pub fn standard(api_url: &str, timeout: Duration) -> Result<Self, ExchangeError> {
        let client = Arc::new(RatesApiClient::new(api_url, timeout)?);
        Ok(Self::offline()
            .with_provider(LatestRatesProvider::new(client.clone()))
            .with_provider(UsdPivotProvider::new(client)))
    }

    /// Appends a provider to the end of the chain (before the static table).
    pub fn with_provider(mut self, provider: impl ExchangeRateProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Names of the chained providers, in order, ending with the static table.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers
            .iter()
            .map(|p| p.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    /// Resolves rates for `base`. Never fails; errors are logged.
    pub async fn resolve(&self, base: &str) -> RateTable {
        for provider in &self.providers {
            match provider.latest(base).await {
                Ok(table) if !table.is_empty() => {
                    tracing::debug!(provider = provider.name(), base, "Exchange rates resolved");
                    return table;
                }
                Ok(_) => {
                    tracing::warn!(provider = provider.name(), base, "Provider returned no rates");
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), base, error = %e, "Exchange rate fetch failed");
                }
            }
        }

        tracing::warn!(base, "All rate providers failed, using static rates");
        self.fallback.table_for(base)
    }
}

impl Default for RateResolver {
    fn default() -> Self {
        Self::offline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use taxfree_types::RateSource;

    struct Failing {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl ExchangeRateProvider for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn latest(&self, _base: &str) -> Result<RateTable, ExchangeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ExchangeError::ServiceUnavailable("HTTP 500".into()))
        }
    }

    struct Fixed(f64);

    #[async_trait::async_trait]
    impl ExchangeRateProvider for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn latest(&self, base: &str) -> Result<RateTable, ExchangeError> {
            Ok(RateTable::new(base, [("TRY".to_string(), self.0)], RateSource::Live))
        }
    }

    struct Empty;

    #[async_trait::async_trait]
    impl ExchangeRateProvider for Empty {
        fn name(&self) -> &'static str {
            "empty"
        }

        async fn latest(&self, base: &str) -> Result<RateTable, ExchangeError> {
            Ok(RateTable::identity(base, RateSource::Live))
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let resolver = RateResolver::offline().with_provider(Fixed(0.25)).with_provider(Fixed(9.0));
        let table = resolver.resolve("JPY").await;
        assert_eq!(table.rate("TRY"), Some(0.25));
    }

    #[tokio::test]
    async fn test_falls_through_to_next_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = RateResolver::offline()
            .with_provider(Failing { calls: calls.clone() })
            .with_provider(Fixed(0.3));

        let table = resolver.resolve("JPY").await;
        assert_eq!(table.rate("TRY"), Some(0.3));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_failing_returns_static_table() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = RateResolver::offline()
            .with_provider(Failing { calls: calls.clone() })
            .with_provider(Failing { calls: calls.clone() });

        let table = resolver.resolve("JPY").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(table.source(), RateSource::Static);
        assert!(!table.is_empty());
        assert_eq!(table.rate("TRY"), Some(0.2386));
    }

    #[tokio::test]
    async fn test_empty_table_counts_as_failure() {
        let resolver = RateResolver::offline().with_provider(Empty);
        let table = resolver.resolve("EUR").await;
        assert_eq!(table.source(), RateSource::Static);
    }

    #[tokio::test]
    async fn test_standard_chain_against_dead_service() {
        let resolver =
            RateResolver::standard("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        assert_eq!(resolver.provider_names(), ["latest", "usd-pivot", "static"]);

        let table = resolver.resolve("JPY").await;
        assert_eq!(table.source(), RateSource::Static);
        assert!(!table.is_empty());
    }
}
