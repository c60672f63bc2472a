//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{CartFilter, CartItem, RateSource};
use crate::i18n::Language;

// ─────────────────────────────────────────────────────────────────────────────
// Settings DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to replace the settings. Countries are catalog codes in
/// home, tourist, third order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub is_tax_free_enabled: bool,
    pub tax_free_rate: f64,
    pub countries: Vec<String>,
}

/// Request to change the UI language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLanguageRequest {
    pub language: Language,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cart DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to add a purchase, priced in the current tourist currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub price: f64,
    /// Category id; "other" when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Cart listing with the filter that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartListResponse {
    pub filter: CartFilter,
    pub items: Vec<CartItem>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Query DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteQuery {
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyQuery {
    #[serde(default = "default_days")]
    pub days: u32,
}

/// Days covered by the daily spending chart.
pub fn default_days() -> u32 {
    7
}

/// Summary of the session rate table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesResponse {
    pub base: String,
    pub source: RateSource,
    pub rates: std::collections::BTreeMap<String, f64>,
}
