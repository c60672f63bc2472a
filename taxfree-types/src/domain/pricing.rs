//! Tax-free price and currency conversion.
//!
//! Both steps are single multiplications, so applying the tax-free discount
//! before or after conversion gives the same result.

use serde::{Deserialize, Serialize};

use super::country::Country;
use super::money;
use super::rates::RateTable;
use super::settings::Settings;
use crate::error::DomainError;

/// Applies the tax-free discount: `amount * (1 - rate / 100)` when enabled.
pub fn tax_free_amount(amount: f64, enabled: bool, rate_percent: f64) -> f64 {
    if enabled {
        amount * (1.0 - rate_percent / 100.0)
    } else {
        amount
    }
}

/// Converts `amount` (in the table's base) into `target`.
///
/// Returns `None` when the table has no rate for `target`.
pub fn convert(amount: f64, rates: &RateTable, target: &str) -> Option<f64> {
    rates.rate(target).map(|rate| amount * rate)
}

/// Parses user input into a price. Blank input is not a price.
pub fn parse_price(input: &str) -> Result<f64, DomainError> {
    let trimmed = input.trim();
    let price: f64 = trimmed
        .parse()
        .map_err(|_| DomainError::InvalidPrice(trimmed.to_string()))?;
    validate_price(price)
}

/// Rejects negative, NaN and infinite prices.
pub fn validate_price(price: f64) -> Result<f64, DomainError> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::InvalidPrice(price.to_string()));
    }
    Ok(price)
}

/// A price shown in one of the selected non-tourist countries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedPrice {
    pub country: Country,
    /// `None` when no rate is known for the country's currency
    pub amount: Option<f64>,
    /// Formatted amount, or `-` when unavailable
    pub display: String,
}

/// Everything the calculator shows for one entered price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub tourist_currency: String,
    pub original_price: f64,
    /// Present only when tax-free calculation is enabled
    pub tax_free_price: Option<f64>,
    pub conversions: Vec<ConvertedPrice>,
}

impl PriceQuote {
    /// Computes the quote for `price` entered in the tourist currency.
    ///
    /// Conversions are listed for every selected country except the tourist
    /// one, home first.
    pub fn compute(price: f64, settings: &Settings, rates: &RateTable) -> Self {
        let tourist = settings.countries().tourist();
        let amount = settings.tax_free_amount(price);

        let conversions = settings
            .countries()
            .converted_targets()
            .map(|country| {
                let converted = convert(amount, rates, &country.currency);
                ConvertedPrice {
                    country: country.clone(),
                    amount: converted,
                    display: money::format_or_unavailable(converted, &country.currency),
                }
            })
            .collect();

        Self {
            tourist_currency: tourist.currency.clone(),
            original_price: price,
            tax_free_price: settings.is_tax_free_enabled.then_some(amount),
            conversions,
        }
    }

    /// The amount carried into conversions and the cart.
    pub fn effective_price(&self) -> f64 {
        self.tax_free_price.unwrap_or(self.original_price)
    }
}
