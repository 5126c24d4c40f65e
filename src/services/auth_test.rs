use super::*;

#[test]
fn admin_match_ignores_case_and_whitespace() {
    let policy = AdminPolicy::new(["Owner@Shop.com"]);
    assert!(policy.is_admin("owner@shop.com"));
    assert!(policy.is_admin("  OWNER@SHOP.COM "));
    assert_eq!(policy.role_of("someone@else.com"), Role::Customer);
}

#[test]
fn empty_policy_has_no_admins() {
    let policy = AdminPolicy::new(Vec::<String>::new());
    assert!(policy.is_empty());
    assert!(!policy.is_admin(""));
}

#[test]
fn blank_entries_are_dropped() {
    let policy = AdminPolicy::new(["", "  "]);
    assert!(policy.is_empty());
}
