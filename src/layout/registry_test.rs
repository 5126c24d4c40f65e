use super::*;
use leptos::prelude::RenderHtml;
use serde_json::json;

#[test]
fn known_ids_resolve_to_their_kind() {
    assert_eq!(ComponentKind::from_id("header"), ComponentKind::Header);
    assert_eq!(ComponentKind::from_id("hero"), ComponentKind::Hero);
    assert_eq!(ComponentKind::from_id("categories"), ComponentKind::Categories);
    assert_eq!(ComponentKind::from_id("featured"), ComponentKind::Featured);
    assert_eq!(ComponentKind::from_id("footer"), ComponentKind::Footer);
}

#[test]
fn unknown_and_empty_ids_fall_back_to_placeholder() {
    assert_eq!(ComponentKind::from_id("newsletter"), ComponentKind::Placeholder);
    assert_eq!(ComponentKind::from_id(""), ComponentKind::Placeholder);
    assert_eq!(ComponentKind::from_id("Header"), ComponentKind::Placeholder);
}

#[test]
fn every_known_kind_renders_with_empty_settings() {
    for kind in ComponentKind::KNOWN {
        let component = ComponentDescriptor::new(kind.schema().tag, "x", 0);
        let html = render_component(&component).to_html();
        assert!(html.starts_with("<div"), "{kind:?} rendered {html}");
    }
}

#[test]
fn defaults_cover_every_non_optional_field() {
    let hero = (ComponentKind::Hero.schema().defaults)();
    assert_eq!(hero.get("heading"), Some(&json!("Welcome")));
    assert_eq!(hero.get("subheading"), Some(&json!("Discover our products")));

    let categories = (ComponentKind::Categories.schema().defaults)();
    assert_eq!(categories.get("categories"), Some(&json!([])));

    assert!((ComponentKind::Placeholder.schema().defaults)().is_empty());
}

#[test]
fn field_schemas_reference_keys_the_renderer_reads() {
    let header = ComponentKind::Header.schema();
    assert_eq!(header.field("showSearch").map(|f| f.kind), Some(FieldKind::Toggle));
    assert_eq!(header.field("announcement").map(|f| f.kind), Some(FieldKind::Markup));
    assert!(header.field("heading").is_none());
    assert!(ComponentKind::Placeholder.schema().fields.is_empty());
}

#[test]
fn render_component_dispatches_unknown_ids_to_placeholder() {
    let component = ComponentDescriptor::new("banner", "Promo Banner", 0);
    assert!(render_component(&component).to_html().contains("Component: Promo Banner"));
}
