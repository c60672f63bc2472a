//! SQLite store integration tests.

#[cfg(test)]
mod tests {
    use taxfree_types::ports::{CART_KEY, KeyValueStore, SETTINGS_KEY};

    use crate::SqliteStore;

    async fn setup_store() -> SqliteStore {
        SqliteStore::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_key() {
        let store = setup_store().await;
        assert!(store.load(SETTINGS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = setup_store().await;
        let doc = r#"{"isTaxFreeEnabled":true,"taxFreeRate":8}"#;

        store.save(SETTINGS_KEY, doc).await.unwrap();

        let loaded = store.load(SETTINGS_KEY).await.unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_document() {
        let store = setup_store().await;

        store.save(CART_KEY, "[1,2,3]").await.unwrap();
        store.save(CART_KEY, "[]").await.unwrap();

        assert_eq!(store.load(CART_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = setup_store().await;

        store.save(CART_KEY, "[]").await.unwrap();
        store.save(SETTINGS_KEY, "{}").await.unwrap();

        assert_eq!(store.load(CART_KEY).await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.load(SETTINGS_KEY).await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/nested/taxfree.db", dir.path().display());

        {
            let store = SqliteStore::new(&url).await.unwrap();
            store.save(CART_KEY, "[]").await.unwrap();
            store.pool().close().await;
        }

        let reopened = SqliteStore::new(&url).await.unwrap();
        assert_eq!(reopened.load(CART_KEY).await.unwrap().as_deref(), Some("[]"));

        reopened.pool().close().await;
    }
}
