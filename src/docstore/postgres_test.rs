use super::*;
use serde_json::json;
use tokio::time::timeout;

async fn live_store() -> PgDocumentStore {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL required for live-db-tests");
    let pool = crate::db::init_pool(&url, 2).await.expect("pool should connect");
    PgDocumentStore::connect(pool).await.expect("listener should start")
}

#[tokio::test]
async fn set_get_delete_round_trip_against_postgres() {
    let store = live_store().await;
    let path = DocPath::new("live_test", uuid::Uuid::new_v4().to_string());

    store.set(&path, json!({"content": "hello"})).await.unwrap();
    assert_eq!(store.get(&path).await.unwrap(), Some(json!({"content": "hello"})));

    store.delete(&path).await.unwrap();
    assert!(store.get(&path).await.unwrap().is_none());
    store.close().await;
}

#[tokio::test]
async fn committed_writes_are_pushed_to_subscribers() {
    let store = live_store().await;
    let path = DocPath::new("live_test", uuid::Uuid::new_v4().to_string());
    let mut sub = store.subscribe(&path);

    store.set(&path, json!({"n": 1})).await.unwrap();

    let pushed = timeout(Duration::from_secs(2), sub.next())
        .await
        .expect("notification timed out")
        .expect("store closed");
    assert_eq!(pushed, Some(json!({"n": 1})));

    store.delete(&path).await.unwrap();
    store.close().await;
}

#[tokio::test]
async fn deleting_an_existing_document_pushes_a_deletion() {
    let store = live_store().await;
    let path = DocPath::new("live_test", uuid::Uuid::new_v4().to_string());
    store.set(&path, json!({"n": 1})).await.unwrap();
    let mut sub = store.subscribe(&path);

    store.delete(&path).await.unwrap();
    store.delete(&path).await.unwrap();

    let pushed = timeout(Duration::from_secs(2), sub.next())
        .await
        .expect("notification timed out")
        .expect("store closed");
    assert_eq!(pushed, None);
    store.close().await;
}

#[tokio::test]
async fn pool_reread_returns_the_committed_value() {
    let store = live_store().await;
    let path = DocPath::new("live_test", uuid::Uuid::new_v4().to_string());
    store.set(&path, json!({"v": 3})).await.unwrap();

    assert_eq!(store.pool.reread(&path).await.unwrap(), Some(json!({"v": 3})));
    store.delete(&path).await.unwrap();
    store.close().await;
}
