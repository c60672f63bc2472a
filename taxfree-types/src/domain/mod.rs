//! Domain models for the tax-free calculator.

pub mod cart;
pub mod category;
pub mod country;
pub mod money;
pub mod pricing;
pub mod rates;
pub mod settings;

pub use cart::{
    Cart, CartFilter, CartItem, CartItemId, CartTotals, CategorySummary, DailyTotal,
    MAX_DAILY_DAYS, NewCartItem, TotalAmount,
};
pub use category::Category;
pub use country::{Country, CountryGroup};
pub use pricing::{ConvertedPrice, PriceQuote};
pub use rates::{RateSource, RateTable};
pub use settings::{SelectedCountries, Settings};
