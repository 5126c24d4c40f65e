use super::*;
use crate::state::test_helpers;

fn admin() -> AdminUser {
    AdminUser { email: test_helpers::ADMIN_EMAIL.into() }
}

fn draft(name: &str, price: f64) -> ProductDraft {
    serde_json::from_value(serde_json::json!({ "name": name, "price": price, "category": "pipes" })).unwrap()
}

#[tokio::test]
async fn listing_seeds_samples_and_filters_by_category() {
    let (state, _mem) = test_helpers::test_app_state();
    let Json(all) = list_products(State(state.clone()), Query(CategoryQuery::default())).await.unwrap();
    assert_eq!(all.len(), 2);

    let query = CategoryQuery { category: Some("pipes".into()) };
    let Json(pipes) = list_products(State(state), Query(query)).await.unwrap();
    assert!(pipes.is_empty());
}

#[tokio::test]
async fn create_update_delete_cycle() {
    let (state, _mem) = test_helpers::test_app_state();
    let (status, Json(created)) = create_product(State(state.clone()), admin(), Json(draft("Pipe", 12.0))).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.record.in_stock);

    let Json(updated) =
        update_product(State(state.clone()), admin(), Path(created.id.clone()), Json(draft("Glass Pipe", 14.0))).await.unwrap();
    assert_eq!(updated.record.name, "Glass Pipe");
    assert_eq!(updated.record.created_at, created.record.created_at);

    let status = delete_product(State(state.clone()), admin(), Path(created.id.clone())).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let result = update_product(State(state), admin(), Path(created.id), Json(draft("Gone", 1.0))).await;
    assert_eq!(result.err(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn invalid_draft_is_unprocessable() {
    let (state, _mem) = test_helpers::test_app_state();
    let result = create_product(State(state), admin(), Json(draft("", 1.0))).await;
    assert_eq!(result.err(), Some(StatusCode::UNPROCESSABLE_ENTITY));
}

#[tokio::test]
async fn write_outage_maps_to_service_unavailable() {
    let (state, mem) = test_helpers::test_app_state();
    mem.fail_writes(true);
    let result = create_product(State(state), admin(), Json(draft("Pipe", 1.0))).await;
    assert_eq!(result.err(), Some(StatusCode::SERVICE_UNAVAILABLE));
}

#[tokio::test]
async fn import_preview_then_import() {
    let (state, _mem) = test_helpers::test_app_state();
    let body = "{\"name\":\"A\",\"price\":1}\n{\"name\":\"B\",\"price\":2}\nnope\n".to_owned();

    let Json(preview) = import_preview(admin(), body.clone()).await.unwrap();
    assert_eq!(preview.total, 2);
    assert_eq!(preview.malformed, 1);

    let Json(report) = import_products(State(state.clone()), admin(), body).await.unwrap();
    assert_eq!(report, ImportReport { imported: 2, skipped: 1 });

    let Json(all) = list_products(State(state), Query(CategoryQuery::default())).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn empty_import_is_bad_request() {
    let (state, _mem) = test_helpers::test_app_state();
    assert_eq!(import_preview(admin(), "   ".into()).await.err(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(import_products(State(state), admin(), "[]".into()).await.err(), Some(StatusCode::BAD_REQUEST));
}
