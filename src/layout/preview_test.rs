use super::*;
use crate::layout::document::ComponentDescriptor;

fn rendered_ids(html: &str) -> Vec<String> {
    html.match_indices(r#"data-component-id=""#)
        .map(|(i, m)| {
            let start = i + m.len();
            let end = start + html[start..].find('"').unwrap();
            html[start..end].to_owned()
        })
        .collect()
}

/// The full opening tag that carries `marker`.
fn opening_tag<'a>(html: &'a str, marker: &str) -> &'a str {
    let at = html.find(marker).unwrap();
    let start = html[..at].rfind('<').unwrap();
    let end = at + html[at..].find('>').unwrap();
    &html[start..=end]
}

#[test]
fn preview_renders_visible_components_in_ascending_order() {
    let mut layout = LayoutDocument::starter();
    layout.components.reverse();
    layout.components[1].visible = false; // featured

    let html = render_preview(&layout, PreviewMode::Desktop, None);
    assert_eq!(rendered_ids(&html), ["header", "hero", "categories", "footer"]);
}

#[test]
fn preview_mode_only_changes_width() {
    let layout = LayoutDocument::starter();
    let desktop = render_preview(&layout, PreviewMode::Desktop, None);
    let tablet = render_preview(&layout, PreviewMode::Tablet, None);
    let mobile = render_preview(&layout, PreviewMode::Mobile, None);

    assert!(desktop.contains("width: 100%"));
    assert!(tablet.contains("width: 768px"));
    assert!(mobile.contains("width: 375px"));
    assert_eq!(rendered_ids(&desktop), rendered_ids(&tablet));
    assert_eq!(rendered_ids(&tablet), rendered_ids(&mobile));
}

#[test]
fn only_the_selected_component_gets_the_ring() {
    let layout = LayoutDocument::starter();
    let html = render_preview(&layout, PreviewMode::Desktop, Some("hero"));
    assert_eq!(html.matches(SELECTED_RING).count(), 1);
    assert!(opening_tag(&html, r#"data-component-id="hero""#).contains(SELECTED_RING));
    assert!(!opening_tag(&html, r#"data-component-id="header""#).contains(SELECTED_RING));
}

#[test]
fn reorder_puts_hero_before_header() {
    let mut layout = LayoutDocument::starter();
    layout.components[0].order = 1;
    layout.components[1].order = 0;
    let html = render_preview(&layout, PreviewMode::Desktop, None);
    assert_eq!(&rendered_ids(&html)[..2], ["hero", "header"]);
}

#[test]
fn unknown_component_renders_placeholder_in_preview() {
    let mut layout = LayoutDocument::starter();
    layout.components.push(ComponentDescriptor::new("newsletter", "Newsletter", 5));
    let html = render_preview(&layout, PreviewMode::Desktop, None);
    assert!(html.contains("Component: Newsletter"));
}

#[test]
fn page_body_has_no_selection_affordances() {
    let html = page_body(&LayoutDocument::starter()).to_html();
    assert!(!html.contains("data-component-id"));
    assert!(!html.contains(SELECTED_RING));
    assert_eq!(html.matches("<section").count(), 5);
}

#[test]
fn preview_mode_parses_only_the_three_modes() {
    assert_eq!(PreviewMode::parse("tablet"), Some(PreviewMode::Tablet));
    assert_eq!(PreviewMode::parse("watch"), None);
    assert_eq!(PreviewMode::default(), PreviewMode::Desktop);
}

#[test]
fn click_target_resolution() {
    assert_eq!(PreviewClick::from_target(Some("hero")), PreviewClick::Component("hero".into()));
    assert_eq!(PreviewClick::from_target(Some("")), PreviewClick::Canvas);
    assert_eq!(PreviewClick::from_target(None), PreviewClick::Canvas);
}
