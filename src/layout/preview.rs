//! Live preview: composes component renderers into one canvas.
//!
//! Only visible components are rendered, in ascending `order`. Each one is
//! wrapped in a selectable container tagged with `data-component-id`; the
//! selected container gets a highlight ring. The viewport mode changes only
//! the canvas width, never which components appear.

use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use super::document::LayoutDocument;
use super::registry;

/// Class added to the selected component's container.
pub const SELECTED_RING: &str = "ring-2 ring-blue-500";

/// Simulated viewport used while editing. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl PreviewMode {
    /// Canvas width as a CSS length.
    #[must_use]
    pub fn width(self) -> &'static str {
        match self {
            Self::Desktop => "100%",
            Self::Tablet => "768px",
            Self::Mobile => "375px",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "desktop" => Some(Self::Desktop),
            "tablet" => Some(Self::Tablet),
            "mobile" => Some(Self::Mobile),
            _ => None,
        }
    }
}

/// Where a click on the preview landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewClick {
    /// Inside the container of the component with this id.
    Component(String),
    /// On the canvas background, outside every component.
    Canvas,
}

impl PreviewClick {
    /// Build from the `data-component-id` the client found, if any.
    #[must_use]
    pub fn from_target(target: Option<&str>) -> Self {
        match target {
            Some(id) if !id.is_empty() => Self::Component(id.to_owned()),
            _ => Self::Canvas,
        }
    }
}

/// Render the editor canvas.
#[must_use]
pub fn render_preview(layout: &LayoutDocument, mode: PreviewMode, selected: Option<&str>) -> String {
    let components = layout
        .visible_in_order()
        .into_iter()
        .map(|component| {
            let ring = if selected == Some(component.id.as_str()) { SELECTED_RING } else { "" };
            view! {
                <div class=format!("relative cursor-pointer {ring}") data-component-id=component.id.clone()>
                    {registry::render_component(component)}
                </div>
            }
        })
        .collect_view();

    view! {
        <div
            class="bg-white rounded-lg shadow-lg mx-auto"
            data-preview-canvas=""
            data-preview-mode=mode.as_str()
            style=format!("width: {}", mode.width())
        >
            {components}
        </div>
    }
    .to_html()
}

/// Public page body: same composition, no selection affordances.
pub fn page_body(layout: &LayoutDocument) -> AnyView {
    layout
        .visible_in_order()
        .into_iter()
        .map(|component| {
            view! { <section data-component=component.id.clone()>{registry::render_component(component)}</section> }
        })
        .collect_view()
        .into_any()
}

#[cfg(test)]
#[path = "preview_test.rs"]
mod tests;
