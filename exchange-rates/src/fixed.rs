//! Hardcoded last-resort rates.

use taxfree_types::{ExchangeError, ExchangeRateProvider, RateSource, RateTable};

/// Units of each currency per 1 JPY.
const JPY_RATES: &[(&str, f64)] = &[
    ("JPY", 1.0),
    ("USD", 0.0067),
    ("EUR", 0.0062),
    ("TRY", 0.2386),
];

/// Terminal provider: a small JPY-denominated table re-based on demand.
///
/// For a base outside the table only the base itself is known, so every
/// other conversion reports unavailable instead of a wrong number.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRateProvider;

impl StaticRateProvider {
    pub fn new() -> Self {
        Self
    }

    /// Builds the table for `base`. Never fails.
    pub fn table_for(&self, base: &str) -> RateTable {
        let per_jpy = |code: &str| {
            JPY_RATES
                .iter()
                .find(|(c, _)| c.eq_ignore_ascii_case(code))
                .map(|(_, rate)| *rate)
        };

        match per_jpy(base) {
            Some(base_rate) => RateTable::new(
                base,
                JPY_RATES
                    .iter()
                    .map(|(code, rate)| (code.to_string(), rate / base_rate)),
                RateSource::Static,
            ),
            None => RateTable::identity(base, RateSource::Static),
        }
    }
}

#[async_trait::async_trait]
impl ExchangeRateProvider for StaticRateProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn latest(&self, base: &str) -> Result<RateTable, ExchangeError> {
        Ok(self.table_for(base))
    }
}
