use super::*;
use crate::services::auth::Role;

#[test]
fn admin_policy_comes_from_config() {
    let (state, _mem) = test_helpers::test_app_state();
    assert_eq!(state.admins.role_of(test_helpers::ADMIN_EMAIL), Role::Admin);
    assert_eq!(state.admins.role_of("visitor@example.com"), Role::Customer);
    assert!(!state.cookie_secure);
}

#[tokio::test]
async fn clones_share_the_same_store() {
    let (state, mem) = test_helpers::test_app_state();
    let clone = state.clone();
    clone.products.list(None).await.unwrap();
    assert_eq!(mem.write_count(), 2);
    assert_eq!(state.products.cached().await.len(), 2);
}
