use super::memory::MemoryStore;
use super::*;
use serde_json::json;
use tokio::time::{Duration, timeout};

async fn next_change(sub: &mut Subscription) -> Option<serde_json::Value> {
    timeout(Duration::from_millis(200), sub.next())
        .await
        .expect("subscription timed out")
        .expect("store closed")
}

#[test]
fn doc_path_parses_collection_and_id() {
    let path = DocPath::parse("settings/layout").expect("valid path");
    assert_eq!(path.collection(), "settings");
    assert_eq!(path.id(), "layout");
    assert_eq!(path.to_string(), "settings/layout");
}

#[test]
fn doc_path_rejects_malformed_input() {
    assert!(DocPath::parse("settings").is_none());
    assert!(DocPath::parse("/layout").is_none());
    assert!(DocPath::parse("settings/").is_none());
}

#[test]
fn decode_errors_are_not_retryable() {
    let path = DocPath::new("settings", "layout");
    let err = decode::<Vec<u8>>(&path, json!("nope")).unwrap_err();
    assert_eq!(err.error_code(), "E_DOCUMENT_DECODE");
    assert!(!err.retryable());
    assert!(DocError::Unavailable("down".into()).retryable());
}

#[tokio::test]
async fn memory_store_set_then_get() {
    let store = MemoryStore::new();
    let path = DocPath::new("static_pages", "about");
    assert!(store.get(&path).await.unwrap().is_none());

    store.set(&path, json!({"content": "hi"})).await.unwrap();
    assert_eq!(store.get(&path).await.unwrap(), Some(json!({"content": "hi"})));
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn memory_store_list_is_scoped_and_sorted() {
    let store = MemoryStore::new();
    store.set(&DocPath::new("products", "b"), json!(2)).await.unwrap();
    store.set(&DocPath::new("products", "a"), json!(1)).await.unwrap();
    store.set(&DocPath::new("settings", "store"), json!(3)).await.unwrap();

    let listed = store.list("products").await.unwrap();
    assert_eq!(listed, vec![("a".to_owned(), json!(1)), ("b".to_owned(), json!(2))]);
}

#[tokio::test]
async fn memory_store_delete_missing_is_ok_and_not_counted() {
    let store = MemoryStore::new();
    store.delete(&DocPath::new("products", "ghost")).await.unwrap();
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn failing_writes_leave_store_untouched() {
    let store = MemoryStore::new();
    store.fail_writes(true);
    let path = DocPath::new("settings", "layout");
    let err = store.set(&path, json!({})).await.unwrap_err();
    assert_eq!(err.error_code(), "E_STORE_UNAVAILABLE");

    store.fail_writes(false);
    assert!(store.get(&path).await.unwrap().is_none());
}

#[tokio::test]
async fn batch_writes_all_documents() {
    let store = MemoryStore::new();
    store
        .set_batch(vec![
            (DocPath::new("products", "1"), json!({"name": "one"})),
            (DocPath::new("products", "2"), json!({"name": "two"})),
        ])
        .await
        .unwrap();
    assert_eq!(store.list("products").await.unwrap().len(), 2);
    assert_eq!(store.write_count(), 2);
}

#[tokio::test]
async fn subscription_only_sees_its_document() {
    let store = MemoryStore::new();
    let watched = DocPath::new("settings", "layout");
    let mut sub = store.subscribe(&watched);

    store.set(&DocPath::new("settings", "store"), json!({"other": true})).await.unwrap();
    store.set(&watched, json!({"components": []})).await.unwrap();

    assert_eq!(next_change(&mut sub).await, Some(json!({"components": []})));
    assert_eq!(sub.path(), &watched);
}

#[tokio::test]
async fn subscription_reports_deletes() {
    let store = MemoryStore::new();
    let path = DocPath::new("photo_bank", "x");
    store.set(&path, json!({})).await.unwrap();

    let mut sub = store.subscribe(&path);
    store.delete(&path).await.unwrap();
    assert_eq!(next_change(&mut sub).await, None);
}

#[tokio::test]
async fn get_typed_reports_decode_errors() {
    let store = MemoryStore::new();
    let path = DocPath::new("settings", "layout");
    store.set(&path, json!("not a struct")).await.unwrap();

    let result = get_typed::<std::collections::HashMap<String, String>>(&store, &path).await;
    assert!(matches!(result, Err(DocError::Decode { .. })));
}

async fn flood_products(store: &MemoryStore, count: usize) {
    let writes = (0..count)
        .map(|i| (DocPath::new("products", format!("p{i}")), json!({ "name": format!("Product {i}") })))
        .collect();
    store.set_batch(writes).await.unwrap();
}

#[tokio::test]
async fn lagged_subscription_rereads_watched_document() {
    let store = MemoryStore::new();
    let watched = DocPath::new("settings", "layout");
    let mut sub = store.subscribe(&watched);

    store.set(&watched, json!({"v": 1})).await.unwrap();
    flood_products(&store, CHANGE_CAPACITY + 44).await;

    let value = timeout(Duration::from_millis(300), sub.next()).await.expect("subscription stalled after lag");
    assert_eq!(value, Some(Some(json!({"v": 1}))));
}

#[tokio::test]
async fn lagged_subscription_keeps_delivering_later_writes() {
    let store = MemoryStore::new();
    let watched = DocPath::new("settings", "layout");
    let mut sub = store.subscribe(&watched);

    store.set(&watched, json!({"v": 1})).await.unwrap();
    flood_products(&store, CHANGE_CAPACITY * 2).await;
    assert_eq!(next_change(&mut sub).await, Some(json!({"v": 1})));

    store.set(&watched, json!({"v": 2})).await.unwrap();
    assert_eq!(next_change(&mut sub).await, Some(json!({"v": 2})));
}

#[tokio::test]
async fn lagged_subscription_reports_a_deleted_document() {
    let store = MemoryStore::new();
    let watched = DocPath::new("static_pages", "about");
    store.set(&watched, json!({"content": "x"})).await.unwrap();
    let mut sub = store.subscribe(&watched);

    store.delete(&watched).await.unwrap();
    flood_products(&store, CHANGE_CAPACITY + 1).await;
    assert_eq!(next_change(&mut sub).await, None);
}
