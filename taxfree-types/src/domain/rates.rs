//! Exchange-rate tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where a rate table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Latest rates quoted directly against the requested base.
    Live,
    /// Cross rates derived from a USD-based quote.
    UsdPivot,
    /// Hardcoded table used when every network provider failed.
    Static,
}

/// Rates for one base currency: units of target per one unit of base.
///
/// The base itself always converts at 1, whether or not the provider
/// listed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    base: String,
    rates: BTreeMap<String, f64>,
    source: RateSource,
}

impl RateTable {
    /// Creates a table. Non-finite and non-positive rates are dropped.
    pub fn new(
        base: impl Into<String>,
        rates: impl IntoIterator<Item = (String, f64)>,
        source: RateSource,
    ) -> Self {
        let base = base.into().to_uppercase();
        let rates = rates
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .map(|(code, rate)| (code.to_uppercase(), rate))
            .collect();
        Self {
            base,
            rates,
            source,
        }
    }

    /// A table that only knows its own base.
    pub fn identity(base: impl Into<String>, source: RateSource) -> Self {
        Self::new(base, std::iter::empty(), source)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn source(&self) -> RateSource {
        self.source
    }

    /// Returns how many units of `currency` one unit of the base buys.
    pub fn rate(&self, currency: &str) -> Option<f64> {
        if currency.eq_ignore_ascii_case(&self.base) {
            return Some(1.0);
        }
        self.rates.get(&currency.to_uppercase()).copied()
    }

    /// Quoted rates, excluding the implicit base entry.
    pub fn rates(&self) -> &BTreeMap<String, f64> {
        &self.rates
    }

    /// True when the table holds no rate other than the base.
    pub fn is_empty(&self) -> bool {
        self.rates.keys().all(|code| *code == self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RateTable {
        RateTable::new(
            "jpy",
            [("try".to_string(), 0.2386), ("USD".to_string(), 0.0067)],
            RateSource::Live,
        )
    }

    #[test]
    fn test_base_converts_at_one() {
        assert_eq!(table().rate("JPY"), Some(1.0));
        assert_eq!(table().base(), "JPY");
    }

    #[test]
    fn test_codes_are_normalized() {
        assert_eq!(table().rate("try"), Some(0.2386));
        assert_eq!(table().rate("EUR"), None);
    }

    #[test]
    fn test_invalid_rates_are_dropped() {
        let t = RateTable::new(
            "USD",
            [
                ("EUR".to_string(), 0.0),
                ("GBP".to_string(), f64::NAN),
                ("JPY".to_string(), -1.0),
            ],
            RateSource::Live,
        );
        assert!(t.is_empty());
    }

    #[test]
    fn test_identity_is_empty() {
        assert!(RateTable::identity("KRW", RateSource::Static).is_empty());
        assert!(!table().is_empty());
    }
}
