//! Shopping Application Service
//!
//! Owns the whole application state: settings, cart, the session rate table
//! and the UI language. Every mutation is persisted before it is applied, so
//! a failed save leaves the in-memory state untouched.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use exchange_rates::RateResolver;
use taxfree_types::domain::{cart, pricing};
use taxfree_types::ports::{CART_KEY, LANGUAGE_KEY, SETTINGS_KEY};
use taxfree_types::{
    AppError, Cart, CartFilter, CartItem, CartItemId, CartTotals, Category, CategorySummary,
    DailyTotal, DomainError, KeyValueStore, Language, NewCartItem, PriceQuote, RateTable,
    SelectedCountries, Settings, StoreError, Translator, UpdateSettingsRequest,
};

/// Application service for the calculator and cart.
///
/// Generic over `S: KeyValueStore` - the adapter is injected at compile time.
pub struct ShoppingService<S: KeyValueStore> {
    store: S,
    resolver: RateResolver,
    settings: Settings,
    cart: Cart,
    rates: RateTable,
    language: Language,
}

impl<S: KeyValueStore> ShoppingService<S> {
    /// Loads persisted state and resolves rates for the tourist currency.
    ///
    /// Missing or unreadable documents fall back to defaults.
    pub async fn load(store: S, resolver: RateResolver) -> Self {
        let settings = load_document::<Settings>(&store, SETTINGS_KEY)
            .await
            .filter(|settings| match settings.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored settings are invalid, using defaults");
                    false
                }
            })
            .unwrap_or_default();
        let cart = load_document::<Cart>(&store, CART_KEY)
            .await
            .unwrap_or_default();
        let language = match load_document::<Language>(&store, LANGUAGE_KEY).await {
            Some(language) => language,
            None => system_language().unwrap_or_default(),
        };

        let rates = resolver
            .resolve(&settings.countries().tourist().currency)
            .await;

        tracing::info!(
            items = cart.len(),
            tourist = %settings.countries().tourist().currency,
            home = %settings.countries().home().currency,
            rates = ?rates.source(),
            "Shopping state loaded"
        );

        Self {
            store,
            resolver,
            settings,
            cart,
            rates,
            language,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validates and persists `settings`, replacing the current ones.
    ///
    /// Rates are re-resolved when the tourist currency changes.
    #[tracing::instrument(skip_all)]
    pub async fn save_settings(&mut self, settings: Settings) -> Result<&Settings, AppError> {
        settings.validate()?;
        self.persist(SETTINGS_KEY, &settings).await?;

        let tourist_changed = settings.countries().tourist().currency
            != self.settings.countries().tourist().currency;
        self.settings = settings;
        if tourist_changed {
            self.refresh_rates().await;
        }

        tracing::info!(
            tax_free = self.settings.is_tax_free_enabled,
            rate = self.settings.tax_free_rate,
            countries = self.settings.countries().len(),
            "Settings saved"
        );
        Ok(&self.settings)
    }

    /// Builds settings from catalog codes and saves them.
    pub async fn update_settings(
        &mut self,
        req: UpdateSettingsRequest,
    ) -> Result<&Settings, AppError> {
        let countries = SelectedCountries::from_codes(&req.countries)?;
        let settings = Settings::new(req.is_tax_free_enabled, req.tax_free_rate, countries)?;
        self.save_settings(settings).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rates and pricing
    // ─────────────────────────────────────────────────────────────────────────────

    /// Rates for the current tourist currency, held for this session only.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Re-resolves rates for the current tourist currency.
    pub async fn refresh_rates(&mut self) -> &RateTable {
        let base = self.settings.countries().tourist().currency.clone();
        self.rates = self.resolver.resolve(&base).await;
        &self.rates
    }

    /// Quotes a price entered in the tourist currency.
    pub fn quote(&self, price: f64) -> Result<PriceQuote, AppError> {
        let price = pricing::validate_price(price)?;
        Ok(PriceQuote::compute(price, &self.settings, &self.rates))
    }

    /// Quotes raw user input such as `"1000"`.
    pub fn quote_input(&self, input: &str) -> Result<PriceQuote, AppError> {
        let price = pricing::parse_price(input)?;
        self.quote(price)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Cart
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Records a purchase of `price` (tourist currency) with the current
    /// settings and home rate.
    #[tracing::instrument(skip(self))]
    pub async fn add_to_cart(
        &mut self,
        price: f64,
        category: Option<&str>,
    ) -> Result<CartItem, AppError> {
        let price = pricing::validate_price(price)?;
        let category = match category {
            None => Category::other(),
            Some(id) => {
                Category::find(id).ok_or_else(|| DomainError::UnknownCategory(id.to_string()))?
            }
        };

        let countries = self.settings.countries();
        let tourist = countries.tourist().clone();
        let home = countries.home().clone();
        if !self.rates.base().eq_ignore_ascii_case(&tourist.currency) {
            self.refresh_rates().await;
        }
        let exchange_rate =
            self.rates
                .rate(&home.currency)
                .ok_or_else(|| AppError::RateUnavailable {
                    from: tourist.currency.clone(),
                    to: home.currency.clone(),
                })?;

        let tax_free_price = self.settings.tax_free_amount(price);
        if !(tax_free_price * exchange_rate).is_finite() {
            return Err(DomainError::InvalidPrice(price.to_string()).into());
        }

        let item = NewCartItem {
            original_price: price,
            tax_free_price,
            tourist_country: tourist,
            home_country: home,
            exchange_rate,
            category,
        };
        self.add_item(item).await
    }

    /// Stamps `item` with an id and the current time and appends it.
    ///
    /// Fails when the item would push a cart total past the largest
    /// representable amount.
    pub async fn add_item(&mut self, item: NewCartItem) -> Result<CartItem, AppError> {
        let item = item.into_item(Utc::now());
        let mut next = self.cart.clone();
        next.push(item.clone());
        let totals = next.totals();
        if !totals.tourist.amount.is_finite() || !totals.home.amount.is_finite() {
            return Err(DomainError::InvalidPrice(item.original_price.to_string()).into());
        }
        self.persist(CART_KEY, &next).await?;
        self.cart = next;

        tracing::info!(id = %item.id, price = item.tax_free_price, category = %item.category.id, "Item added to cart");
        Ok(item)
    }

    /// Removes the item with `id`.
    #[tracing::instrument(skip(self, id), fields(id = %id))]
    pub async fn remove_item(&mut self, id: &CartItemId) -> Result<CartItem, AppError> {
        let mut next = self.cart.clone();
        let removed = next
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Cart item {}", id)))?;
        self.persist(CART_KEY, &next).await?;
        self.cart = next;
        Ok(removed)
    }

    /// Empties the cart, returning how many items were removed.
    pub async fn clear_cart(&mut self) -> Result<usize, AppError> {
        let removed = self.cart.len();
        self.persist(CART_KEY, &Cart::default()).await?;
        self.cart.clear();
        tracing::info!(removed, "Cart cleared");
        Ok(removed)
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    pub fn by_category(&self) -> Vec<CategorySummary> {
        self.cart.by_category()
    }

    /// Daily tax-free totals for the `days` days ending today (UTC).
    pub fn daily_totals(&self, days: u32) -> Result<Vec<DailyTotal>, AppError> {
        let days = cart::validate_days(days)?;
        Ok(self.cart.daily_totals(Utc::now().date_naive(), days))
    }

    pub fn filter_items(&self, filter: &CartFilter) -> Vec<CartItem> {
        self.cart.filter(filter).cloned().collect()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Language
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.language)
    }

    /// Persists and switches the UI language.
    pub async fn set_language(&mut self, language: Language) -> Result<Language, AppError> {
        self.persist(LANGUAGE_KEY, &language).await?;
        self.language = language;
        Ok(language)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────────

    async fn persist<T>(&self, key: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let doc = serde_json::to_string(value).map_err(StoreError::from)?;
        self.store.save(key, &doc).await.map_err(|e| {
            tracing::error!(key, error = %e, "Save failed");
            AppError::from(e)
        })
    }
}

/// Reads and parses one document. Absent, unreadable and unparsable
/// documents all come back as `None`.
async fn load_document<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let doc = match store.load(key).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Could not read stored document, using defaults");
            return None;
        }
    };

    match serde_json::from_str(&doc) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored document is not valid, using defaults");
            None
        }
    }
}

/// Language from the process locale (`LC_ALL`, then `LANG`).
fn system_language() -> Option<Language> {
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|locale| Language::from_locale(&locale))
}
