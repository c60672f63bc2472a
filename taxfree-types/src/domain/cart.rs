//! Cart items and cart aggregation.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::country::Country;
use crate::error::DomainError;

/// Longest window the daily chart covers.
pub const MAX_DAILY_DAYS: u32 = 366;

/// Checks a daily-chart window, `1..=MAX_DAILY_DAYS` days.
pub fn validate_days(days: u32) -> Result<u32, DomainError> {
    if days == 0 || days > MAX_DAILY_DAYS {
        return Err(DomainError::ValidationError(format!(
            "days must be between 1 and {}, got {}",
            MAX_DAILY_DAYS, days
        )));
    }
    Ok(days)
}

/// Opaque unique identifier of a cart item.
///
/// New ids are UUIDs; ids written by older clients are arbitrary strings
/// and are kept as they are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(String);

impl CartItemId {
    /// Creates a new random CartItemId.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CartItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CartItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CartItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CartItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A cart item before it has an id and a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub original_price: f64,
    pub tax_free_price: f64,
    pub tourist_country: Country,
    pub home_country: Country,
    pub exchange_rate: f64,
    pub category: Category,
}

impl NewCartItem {
    /// Stamps the item with a fresh id and the given creation time.
    pub fn into_item(self, date: DateTime<Utc>) -> CartItem {
        CartItem {
            id: CartItemId::new(),
            original_price: self.original_price,
            tax_free_price: self.tax_free_price,
            tourist_country: self.tourist_country,
            home_country: self.home_country,
            exchange_rate: self.exchange_rate,
            category: self.category,
            date,
        }
    }
}

/// One recorded purchase. Never mutated after creation.
///
/// Countries, rate and category are copies taken when the item was added,
/// so later settings changes leave recorded purchases untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    /// Entered price, tourist currency
    pub original_price: f64,
    /// Price after the tax-free discount, tourist currency
    pub tax_free_price: f64,
    pub tourist_country: Country,
    pub home_country: Country,
    /// Home currency units per one tourist currency unit
    pub exchange_rate: f64,
    /// Records written before categories existed have none; they load as "other".
    #[serde(default, deserialize_with = "category_or_other")]
    pub category: Category,
    pub date: DateTime<Utc>,
}

fn category_or_other<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Category>::deserialize(deserializer)?.unwrap_or_default())
}

impl CartItem {
    /// Contribution to the home-currency total.
    pub fn home_price(&self) -> f64 {
        self.tax_free_price * self.exchange_rate
    }

    pub fn has_discount(&self) -> bool {
        self.original_price != self.tax_free_price
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregates
// ─────────────────────────────────────────────────────────────────────────────

/// A summed amount labelled with its currency code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalAmount {
    pub amount: f64,
    /// Empty when the cart is empty
    pub currency: String,
}

/// Running totals over the whole cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartTotals {
    pub tourist: TotalAmount,
    pub home: TotalAmount,
}

/// Spend in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
    /// Sum of tax-free prices, tourist currency
    pub total: f64,
}

/// Tax-free spend on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
}

/// Item filter. Unset fields match everything; date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartFilter {
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl CartFilter {
    pub fn matches(&self, item: &CartItem) -> bool {
        let day = item.date.date_naive();
        self.category.as_deref().is_none_or(|id| item.category.id == id)
            && self.from.is_none_or(|from| day >= from)
            && self.to.is_none_or(|to| day <= to)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cart
// ─────────────────────────────────────────────────────────────────────────────

/// The ordered collection of recorded purchases.
///
/// Persisted as a plain JSON array of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn push(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Removes the item with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: &CartItemId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sums tax-free prices in tourist currency and their home-currency value.
    ///
    /// Currency labels come from the most recently added item; mixed-currency
    /// carts are summed as raw numbers.
    pub fn totals(&self) -> CartTotals {
        let (tourist_currency, home_currency) = self
            .items
            .last()
            .map(|item| {
                (
                    item.tourist_country.currency.clone(),
                    item.home_country.currency.clone(),
                )
            })
            .unwrap_or_default();

        let (tourist, home) = self.items.iter().fold((0.0, 0.0), |(tourist, home), item| {
            (tourist + item.tax_free_price, home + item.home_price())
        });

        CartTotals {
            tourist: TotalAmount {
                amount: tourist,
                currency: tourist_currency,
            },
            home: TotalAmount {
                amount: home,
                currency: home_currency,
            },
        }
    }

    /// Groups items by category id.
    ///
    /// Catalog categories come first in catalog order, then ids the catalog
    /// does not know in the order they were first seen. Each group carries
    /// the category snapshot of its first item.
    pub fn by_category(&self) -> Vec<CategorySummary> {
        let mut groups: Vec<CategorySummary> = Vec::new();
        for item in &self.items {
            match groups.iter_mut().find(|g| g.category.id == item.category.id) {
                Some(group) => {
                    group.count += 1;
                    group.total += item.tax_free_price;
                }
                None => groups.push(CategorySummary {
                    category: item.category.clone(),
                    count: 1,
                    total: item.tax_free_price,
                }),
            }
        }
        // Stable sort keeps first-seen order among unknown ids.
        groups.sort_by_key(|g| Category::catalog_position(&g.category.id).unwrap_or(usize::MAX));
        groups
    }

    /// Tax-free totals for the `days` days ending at `today`, oldest first.
    /// Days without purchases are reported as zero. The window is capped at
    /// `MAX_DAILY_DAYS`.
    pub fn daily_totals(&self, today: NaiveDate, days: u32) -> Vec<DailyTotal> {
        (0..days.min(MAX_DAILY_DAYS))
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
            .map(|date| DailyTotal {
                date,
                total: self
                    .items
                    .iter()
                    .filter(|item| item.date.date_naive() == date)
                    .map(|item| item.tax_free_price)
                    .sum(),
            })
            .collect()
    }

    /// Items matching `filter`, in cart order.
    pub fn filter<'a>(&'a self, filter: &'a CartFilter) -> impl Iterator<Item = &'a CartItem> {
        self.items.iter().filter(move |item| filter.matches(item))
    }
}
