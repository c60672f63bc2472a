//! ShoppingService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use exchange_rates::RateResolver;
    use taxfree_types::ports::{CART_KEY, LANGUAGE_KEY, SETTINGS_KEY};
    use taxfree_types::{
        AppError, CartFilter, CartItemId, ExchangeError, ExchangeRateProvider, KeyValueStore,
        Language, RateSource, RateTable, Settings, StoreError, UpdateSettingsRequest,
    };

    use crate::ShoppingService;

    /// Simple in-memory store whose writes can be made to fail.
    #[derive(Default)]
    pub struct MockStore {
        docs: Mutex<HashMap<String, String>>,
        fail_writes: AtomicBool,
    }

    impl MockStore {
        pub fn with_doc(key: &str, doc: &str) -> Self {
            let store = Self::default();
            store
                .docs
                .lock()
                .unwrap()
                .insert(key.to_string(), doc.to_string());
            store
        }

        pub fn doc(&self, key: &str) -> Option<String> {
            self.docs.lock().unwrap().get(key).cloned()
        }

        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl KeyValueStore for MockStore {
        async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.doc(key))
        }

        async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("quota exceeded".into()));
            }
            self.docs
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    /// Answers every base with fixed rates.
    pub struct FixedRates(pub Vec<(&'static str, f64)>);

    #[async_trait]
    impl ExchangeRateProvider for FixedRates {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn latest(&self, base: &str) -> Result<RateTable, ExchangeError> {
            Ok(RateTable::new(
                base,
                self.0.iter().map(|(c, r)| (c.to_string(), *r)),
                RateSource::Live,
            ))
        }
    }

    pub struct Unavailable;

    #[async_trait]
    impl ExchangeRateProvider for Unavailable {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        async fn latest(&self, _base: &str) -> Result<RateTable, ExchangeError> {
            Err(ExchangeError::ServiceUnavailable("HTTP 503".into()))
        }
    }

    fn jpy_resolver() -> RateResolver {
        RateResolver::offline().with_provider(FixedRates(vec![("TRY", 0.2386), ("USD", 0.0067)]))
    }

    async fn service() -> ShoppingService<MockStore> {
        ShoppingService::load(MockStore::default(), jpy_resolver()).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_load_defaults_when_store_empty() {
        let service = service().await;
        assert_eq!(service.settings(), &Settings::default());
        assert!(service.cart().is_empty());
        assert_eq!(service.rates().base(), "JPY");
        assert_eq!(service.rates().source(), RateSource::Live);
    }

    #[tokio::test]
    async fn test_load_defaults_when_settings_corrupt() {
        let store = MockStore::with_doc(SETTINGS_KEY, "{not json");
        let service = ShoppingService::load(store, jpy_resolver()).await;
        assert_eq!(service.settings(), &Settings::default());
    }

    #[tokio::test]
    async fn test_load_defaults_when_rate_out_of_range() {
        let mut doc = serde_json::to_value(Settings::default()).unwrap();
        doc["taxFreeRate"] = serde_json::json!(150);
        let store = MockStore::with_doc(SETTINGS_KEY, &doc.to_string());
        let service = ShoppingService::load(store, jpy_resolver()).await;
        assert_eq!(service.settings().tax_free_rate, 10.0);
    }

    #[tokio::test]
    async fn test_load_legacy_cart() {
        let legacy = r#"[{"id":"abc123","originalPrice":1000,"taxFreePrice":900,
            "touristCountry":{"code":"JP","name":"Japan","currency":"JPY","flag":"🇯🇵","region":"Asia"},
            "homeCountry":{"code":"TR","name":"Turkey","currency":"TRY","flag":"🇹🇷","region":"Europe"},
            "exchangeRate":0.2386,"date":"2024-01-05T09:00:00.000Z"}]"#;
        let store = MockStore::with_doc(CART_KEY, legacy);
        let service = ShoppingService::load(store, jpy_resolver()).await;

        assert_eq!(service.cart().len(), 1);
        assert!(service.cart().items()[0].category.is_other());
        assert_eq!(service.by_category()[0].count, 1);
    }

    #[tokio::test]
    async fn test_load_saved_language() {
        let store = MockStore::with_doc(LANGUAGE_KEY, "\"ja\"");
        let service = ShoppingService::load(store, jpy_resolver()).await;
        assert_eq!(service.language(), Language::Ja);
        assert_eq!(service.translator().t("common.save"), "保存");
    }

    #[tokio::test]
    async fn test_load_with_rate_service_down_uses_static_table() {
        let resolver = RateResolver::offline().with_provider(Unavailable);
        let service = ShoppingService::load(MockStore::default(), resolver).await;
        assert_eq!(service.rates().source(), RateSource::Static);
        assert!(!service.rates().is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_update_settings_persists_and_refreshes_rates() {
        let mut service = service().await;
        let req = UpdateSettingsRequest {
            is_tax_free_enabled: true,
            tax_free_rate: 8.0,
            countries: vec!["TR".into(), "US".into(), "JP".into()],
        };

        let saved = service.update_settings(req).await.unwrap().clone();
        assert_eq!(saved.tax_free_rate, 8.0);
        assert_eq!(saved.countries().third().unwrap().code, "JP");
        assert_eq!(service.rates().base(), "USD");

        let stored: Settings =
            serde_json::from_str(&service.store().doc(SETTINGS_KEY).unwrap()).unwrap();
        assert_eq!(stored, saved);
    }

    #[tokio::test]
    async fn test_update_settings_rejects_single_country() {
        let mut service = service().await;
        let req = UpdateSettingsRequest {
            is_tax_free_enabled: true,
            tax_free_rate: 10.0,
            countries: vec!["TR".into()],
        };

        let result = service.update_settings(req).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(service.store().doc(SETTINGS_KEY).is_none());
    }

    #[tokio::test]
    async fn test_save_settings_failure_keeps_state() {
        let mut service = service().await;
        service.store().fail_writes(true);

        let mut changed = Settings::default();
        changed.tax_free_rate = 20.0;
        let result = service.save_settings(changed).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(service.settings().tax_free_rate, 10.0);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Pricing
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_quote_example() {
        let service = service().await;
        let quote = service.quote_input("1000").unwrap();

        assert!((quote.tax_free_price.unwrap() - 900.0).abs() < 1e-9);
        let home = &quote.conversions[0];
        assert_eq!(home.country.currency, "TRY");
        assert!((home.amount.unwrap() - 214.74).abs() < 1e-9);
        assert_eq!(home.display, "₺214,74");
    }

    #[tokio::test]
    async fn test_quote_rejects_bad_input() {
        let service = service().await;
        assert!(matches!(service.quote_input("abc"), Err(AppError::BadRequest(_))));
        assert!(matches!(service.quote(-1.0), Err(AppError::BadRequest(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Cart
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_add_to_cart_snapshots_settings() {
        let mut service = service().await;
        let item = service.add_to_cart(1000.0, Some("tech")).await.unwrap();

        assert_eq!(item.original_price, 1000.0);
        assert!((item.tax_free_price - 900.0).abs() < 1e-9);
        assert_eq!(item.exchange_rate, 0.2386);
        assert_eq!(item.tourist_country.code, "JP");
        assert_eq!(item.home_country.code, "TR");
        assert_eq!(item.category.id, "tech");
        assert!((item.home_price() - 214.74).abs() < 1e-9);

        let stored = service.store().doc(CART_KEY).unwrap();
        assert!(stored.contains(item.id.as_str()));
    }

    #[tokio::test]
    async fn test_settings_change_does_not_touch_recorded_items() {
        let mut service = service().await;
        let item = service.add_to_cart(500.0, None).await.unwrap();

        let req = UpdateSettingsRequest {
            is_tax_free_enabled: false,
            tax_free_rate: 0.0,
            countries: vec!["US".into(), "TR".into()],
        };
        service.update_settings(req).await.unwrap();

        assert_eq!(service.cart().items()[0], item);
        assert!(item.category.is_other());
    }

    #[tokio::test]
    async fn test_add_to_cart_unknown_category() {
        let mut service = service().await;
        let result = service.add_to_cart(100.0, Some("weapons")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(service.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_cart_without_home_rate() {
        let resolver = RateResolver::offline().with_provider(FixedRates(vec![("USD", 0.0067)]));
        let mut service = ShoppingService::load(MockStore::default(), resolver).await;

        let result = service.add_to_cart(100.0, None).await;
        assert!(matches!(result, Err(AppError::RateUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_overflowing_home_price() {
        let resolver = RateResolver::offline().with_provider(FixedRates(vec![("TRY", 2.0)]));
        let mut service = ShoppingService::load(MockStore::default(), resolver).await;

        let result = service.add_to_cart(f64::MAX, None).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(service.cart().is_empty());
        assert!(service.store().doc(CART_KEY).is_none());
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_overflowing_total() {
        let mut service = service().await;
        service.add_to_cart(1e308, None).await.unwrap();

        let result = service.add_to_cart(1e308, None).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(service.cart().len(), 1);
        assert!(service.totals().tourist.amount.is_finite());
    }

    #[tokio::test]
    async fn test_add_failure_leaves_cart_unchanged() {
        let mut service = service().await;
        service.add_to_cart(100.0, None).await.unwrap();
        service.store().fail_writes(true);

        let result = service.add_to_cart(200.0, None).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(service.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let mut service = service().await;
        let a = service.add_to_cart(100.0, Some("food")).await.unwrap();
        let b = service.add_to_cart(200.0, Some("tech")).await.unwrap();
        let c = service.add_to_cart(300.0, Some("food")).await.unwrap();
        let before = service.totals();

        let removed = service.remove_item(&b.id).await.unwrap();
        assert_eq!(removed, b);
        assert_eq!(service.cart().items(), &[a, c]);

        let after = service.totals();
        assert!((after.tourist.amount - (before.tourist.amount - b.tax_free_price)).abs() < 1e-9);
        assert!((after.home.amount - (before.home.amount - b.home_price())).abs() < 1e-9);

        let stored: Vec<serde_json::Value> =
            serde_json::from_str(&service.store().doc(CART_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_missing_item() {
        let mut service = service().await;
        let result = service.remove_item(&CartItemId::from("nope")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let mut service = service().await;
        service.add_to_cart(100.0, None).await.unwrap();
        service.add_to_cart(200.0, None).await.unwrap();

        assert_eq!(service.clear_cart().await.unwrap(), 2);
        assert!(service.cart().is_empty());
        assert_eq!(service.store().doc(CART_KEY).as_deref(), Some("[]"));
        assert_eq!(service.totals().tourist.currency, "");
    }

    #[tokio::test]
    async fn test_totals_and_analytics() {
        let mut service = service().await;
        service.add_to_cart(1000.0, Some("food")).await.unwrap();
        service.add_to_cart(2000.0, Some("food")).await.unwrap();
        service.add_to_cart(500.0, Some("gifts")).await.unwrap();

        let totals = service.totals();
        assert!((totals.tourist.amount - 3150.0).abs() < 1e-9);
        assert!((totals.home.amount - 3150.0 * 0.2386).abs() < 1e-9);
        assert_eq!(totals.tourist.currency, "JPY");
        assert_eq!(totals.home.currency, "TRY");

        let categories = service.by_category();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category.id, "food");
        assert_eq!(categories[0].count, 2);

        let daily = service.daily_totals(7).unwrap();
        assert_eq!(daily.len(), 7);
        assert!((daily[6].total - 3150.0).abs() < 1e-9);

        let gifts = service.filter_items(&CartFilter {
            category: Some("gifts".into()),
            ..CartFilter::default()
        });
        assert_eq!(gifts.len(), 1);
    }

    #[tokio::test]
    async fn test_daily_totals_rejects_out_of_range_window() {
        let service = service().await;
        assert!(matches!(service.daily_totals(0), Err(AppError::BadRequest(_))));
        assert!(matches!(
            service.daily_totals(u32::MAX),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(service.daily_totals(366).unwrap().len(), 366);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Language
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_set_language_persists() {
        let mut service = service().await;
        service.set_language(Language::Tr).await.unwrap();

        assert_eq!(service.language(), Language::Tr);
        assert_eq!(service.store().doc(LANGUAGE_KEY).as_deref(), Some("\"tr\""));
        assert_eq!(service.translator().t("analytics.total"), "Toplam");
    }
}
