//! Exchange rate provider port.
//!
//! Implementations can be HTTP clients, static tables, test doubles, etc.

use crate::domain::RateTable;
use crate::error::ExchangeError;

/// One strategy for obtaining a rate table.
#[async_trait::async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Latest rates for `base`: units of each currency per one unit of `base`.
    async fn latest(&self, base: &str) -> Result<RateTable, ExchangeError>;
}
