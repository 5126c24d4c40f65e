use super::*;
use serde_json::json;

fn hero_with(settings: serde_json::Value) -> ComponentDescriptor {
    let mut c = ComponentDescriptor::new("hero", "Hero Banner", 1);
    if let serde_json::Value::Object(map) = settings {
        c.settings = map;
    }
    c
}

fn field_value<'a>(view: &'a PanelView, key: &str) -> &'a serde_json::Value {
    let PanelView::Component { fields, .. } = view else {
        panic!("expected component view, got {view:?}");
    };
    &fields.iter().find(|f| f.key == key).unwrap().value
}

#[test]
fn no_selection_shows_one_color_per_theme_key() {
    let layout = LayoutDocument::starter();
    let view = view(&layout, None);
    let PanelView::Theme { colors } = &view else {
        panic!("expected theme view");
    };
    assert_eq!(colors.len(), layout.theme.len());
    assert!(colors.iter().any(|c| c.key == "primaryColor" && c.value == "#3B82F6"));
}

#[test]
fn component_view_shows_stored_values_then_defaults() {
    let layout = LayoutDocument::starter();
    let hero = hero_with(json!({ "heading": "Spring Sale" }));
    let view = view(&layout, Some(&hero));

    assert_eq!(field_value(&view, "heading"), &json!("Spring Sale"));
    assert_eq!(field_value(&view, "subheading"), &json!("Discover our products"));
    assert_eq!(field_value(&view, "backgroundImage"), &serde_json::Value::Null);
}

#[test]
fn merge_keeps_every_other_setting() {
    let hero = hero_with(json!({ "heading": "Old", "backgroundColor": "#000000" }));
    let merged = merge_field(&hero, "heading", json!("New")).unwrap();
    assert_eq!(merged.get("heading"), Some(&json!("New")));
    assert_eq!(merged.get("backgroundColor"), Some(&json!("#000000")));
}

#[test]
fn merge_null_clears_back_to_default() {
    let hero = hero_with(json!({ "heading": "Old" }));
    let merged = merge_field(&hero, "heading", serde_json::Value::Null).unwrap();
    assert!(!merged.contains_key("heading"));
}

#[test]
fn merge_rejects_unknown_keys_and_wrong_types() {
    let hero = hero_with(json!({}));
    let err = merge_field(&hero, "showSearch", json!(true)).unwrap_err();
    assert_eq!(err.error_code(), "E_UNKNOWN_FIELD");

    let err = merge_field(&hero, "heading", json!(42)).unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_VALUE");

    let categories = ComponentDescriptor::new("categories", "Categories Grid", 2);
    assert!(merge_field(&categories, "categories", json!(["shoes"])).is_err());
    assert!(merge_field(&categories, "categories", json!([{ "name": "Pipes" }])).is_ok());
}

#[test]
fn dispatch_edit_hands_over_the_full_object() {
    let hero = hero_with(json!({ "subheading": "Keep me" }));
    let mut seen = None;
    dispatch_edit(&hero, "heading", json!("Hi"), |id, settings| seen = Some((id.to_owned(), settings))).unwrap();

    let (id, settings) = seen.unwrap();
    assert_eq!(id, "hero");
    assert_eq!(settings.len(), 2);
    assert_eq!(settings.get("subheading"), Some(&json!("Keep me")));
}

#[test]
fn dispatch_edit_skips_callback_on_error() {
    let hero = hero_with(json!({}));
    let mut called = false;
    let result = dispatch_edit(&hero, "nope", json!("x"), |_, _| called = true);
    assert!(result.is_err());
    assert!(!called);
}

#[test]
fn theme_edit_trims_and_rejects_blank() {
    let mut seen = None;
    dispatch_theme_edit("primaryColor", " #FF0000 ", |k, v| seen = Some((k.to_owned(), v.to_owned()))).unwrap();
    assert_eq!(seen, Some(("primaryColor".to_owned(), "#FF0000".to_owned())));

    let err = dispatch_theme_edit("primaryColor", "  ", |_, _| {}).unwrap_err();
    assert_eq!(err.error_code(), "E_EMPTY_THEME_VALUE");
}

#[test]
fn html_escapes_values_and_checks_toggles() {
    let layout = LayoutDocument::starter();
    let mut header = ComponentDescriptor::new("header", "Header", 0);
    header.settings.insert("logo".into(), json!("\"><script>"));
    let html = render_html(&view(&layout, Some(&header)));

    assert!(html.contains(r#"data-settings-for="header""#));
    assert!(!html.contains("<script>"));
    let toggle = &html[html.find(r#"name="showSearch""#).unwrap()..];
    assert!(toggle[..toggle.find('>').unwrap()].contains("checked"));
    assert!(html.contains("&quot;"));
}

#[test]
fn placeholder_component_has_an_empty_form() {
    let layout = LayoutDocument::starter();
    let unknown = ComponentDescriptor::new("newsletter", "Newsletter", 9);
    let PanelView::Component { fields, .. } = view(&layout, Some(&unknown)) else {
        panic!("expected component view");
    };
    assert!(fields.is_empty());
}
