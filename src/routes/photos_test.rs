use super::*;
use crate::state::test_helpers;

fn admin() -> AdminUser {
    AdminUser { email: test_helpers::ADMIN_EMAIL.into() }
}

fn new_photo(name: &str, category: &str) -> NewPhoto {
    NewPhoto { name: name.into(), url: format!("https://cdn.example.com/{name}.jpg"), category: Some(category.into()) }
}

#[tokio::test]
async fn save_list_and_delete() {
    let (state, _mem) = test_helpers::test_app_state();
    let (status, Json(saved)) = save_photo(State(state.clone()), admin(), Json(new_photo("hero", "banners"))).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let query = CategoryQuery { category: Some("banners".into()) };
    let Json(listed) = list_photos(State(state.clone()), admin(), Query(query)).await.unwrap();
    assert_eq!(listed, vec![saved.clone()]);

    let Json(deleted) = delete_photo(State(state.clone()), admin(), Path(saved.id.clone())).await.unwrap();
    assert_eq!(deleted, saved);

    let result = delete_photo(State(state), admin(), Path(saved.id)).await;
    assert_eq!(result.err(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn touch_is_no_content_even_when_missing() {
    let (state, _mem) = test_helpers::test_app_state();
    assert_eq!(touch_photo(State(state), admin(), Path("ghost".into())).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn clear_reports_count() {
    let (state, _mem) = test_helpers::test_app_state();
    save_photo(State(state.clone()), admin(), Json(new_photo("a", "x"))).await.unwrap();
    save_photo(State(state.clone()), admin(), Json(new_photo("b", "y"))).await.unwrap();

    let Json(response) = clear_photos(State(state), admin()).await.unwrap();
    assert_eq!(response.cleared, 2);
}
