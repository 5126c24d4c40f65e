use super::*;
use crate::docstore::memory::MemoryStore;

#[tokio::test]
async fn missing_page_is_created_with_default_text() {
    let mem = MemoryStore::new();
    let page = load(&mem, "about").await.unwrap();
    assert!(page.content.starts_with("Welcome to our store!"));
    assert!(crate::services::parse_rfc3339(&page.updated_at).is_some());
    assert_eq!(mem.write_count(), 1);

    let again = load(&mem, "about").await.unwrap();
    assert_eq!(again, page);
    assert_eq!(mem.write_count(), 1);
}

#[tokio::test]
async fn unknown_page_defaults_to_empty() {
    let mem = MemoryStore::new();
    let page = load(&mem, "shipping").await.unwrap();
    assert_eq!(page.content, "");
}

#[tokio::test]
async fn saved_content_is_returned_on_next_load() {
    let mem = MemoryStore::new();
    save(&mem, "terms", "No refunds.".into()).await.unwrap();
    assert_eq!(load(&mem, "terms").await.unwrap().content, "No refunds.");
}

#[tokio::test]
async fn page_ids_cannot_escape_the_collection() {
    let mem = MemoryStore::new();
    for bad in ["", "../settings", "a/b", "x y"] {
        let err = load(&mem, bad).await.unwrap_err();
        assert_eq!(err.error_code(), "E_INVALID_PAGE_ID", "{bad:?}");
    }
    assert_eq!(mem.write_count(), 0);
}

#[tokio::test]
async fn failed_default_write_still_serves_default() {
    let mem = MemoryStore::new();
    mem.fail_writes(true);
    let page = load(&mem, "contact").await.unwrap();
    assert_eq!(page.content, default_content("contact"));
}

#[tokio::test]
async fn read_failure_surfaces_as_store_error() {
    let mem = MemoryStore::new();
    mem.fail_reads(true);
    let err = load(&mem, "privacy").await.unwrap_err();
    assert_eq!(err.error_code(), "E_STORE_UNAVAILABLE");
    assert!(err.retryable());
}
