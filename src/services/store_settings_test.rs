use super::*;
use crate::docstore::memory::MemoryStore;
use serde_json::json;

#[tokio::test]
async fn missing_settings_are_created_from_defaults() {
    let mem = MemoryStore::new();
    let settings = load(&mem).await.unwrap();

    assert_eq!(settings, StoreSettings::default());
    assert!(settings.features.age_verification);
    assert_eq!(settings.store.name, "Bullocks Smoke Shop");
    assert_eq!(mem.write_count(), 1);

    load(&mem).await.unwrap();
    assert_eq!(mem.write_count(), 1);
}

#[tokio::test]
async fn partial_documents_fill_in_defaults() {
    let mem = MemoryStore::new();
    mem.set(&StoreSettings::path(), json!({ "features": { "cart": true } })).await.unwrap();

    let settings = load(&mem).await.unwrap();
    assert!(settings.features.cart);
    assert!(settings.features.user_accounts);
    assert_eq!(settings.background_color(), Some("#F3F4F6"));
}

#[tokio::test]
async fn failed_default_write_still_returns_defaults() {
    let mem = MemoryStore::new();
    mem.fail_writes(true);
    assert_eq!(load(&mem).await.unwrap(), StoreSettings::default());
    assert_eq!(mem.write_count(), 0);
}

#[tokio::test]
async fn read_failure_is_an_error_but_fallback_is_default() {
    let mem = MemoryStore::new();
    mem.fail_reads(true);
    assert!(load(&mem).await.is_err());
    assert_eq!(load_or_default(&mem).await, StoreSettings::default());
}

#[tokio::test]
async fn save_round_trips_through_the_store() {
    let mem = MemoryStore::new();
    let mut settings = StoreSettings::default();
    settings.features.age_verification = false;
    settings.store.phone = "555-0100".into();
    save(&mem, &settings).await.unwrap();

    assert_eq!(load(&mem).await.unwrap(), settings);
}

#[test]
fn defaults_serialize_with_camel_case_keys() {
    let value = serde_json::to_value(StoreSettings::default()).unwrap();
    assert_eq!(value["features"]["ageVerification"], json!(true));
    assert_eq!(value["store"]["contactEmail"], json!("support@bullocksmokeshop.com"));
    assert_eq!(value["theme"]["accentColor"], json!("#10B981"));
}
