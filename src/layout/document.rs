//! Layout document: the persisted storefront page configuration.
//!
//! The document is stored whole at `settings/layout`. Component display order
//! comes from each descriptor's `order` field, never from array position, so
//! storage order and render order are independent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::docstore::DocPath;

/// Collection holding store-wide singleton documents.
pub const SETTINGS_COLLECTION: &str = "settings";
/// Document id of the layout inside `SETTINGS_COLLECTION`.
pub const LAYOUT_DOC_ID: &str = "layout";

/// Free-form per-component settings. Missing keys fall back to registry defaults.
pub type Settings = serde_json::Map<String, serde_json::Value>;

/// Theme key → color value.
pub type Theme = BTreeMap<String, String>;

/// One configurable block of the storefront page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Stable identifier; also selects the registry entry.
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub order: i64,
    #[serde(default)]
    pub settings: Settings,
}

impl ComponentDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: i64) -> Self {
        Self { id: id.into(), name: name.into(), visible: true, order, settings: Settings::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub components: Vec<ComponentDescriptor>,
    #[serde(default)]
    pub theme: Theme,
}

impl LayoutDocument {
    /// The starter document written the first time no layout exists.
    #[must_use]
    pub fn starter() -> Self {
        let components = vec![
            ComponentDescriptor::new("header", "Header", 0),
            ComponentDescriptor::new("hero", "Hero Banner", 1),
            ComponentDescriptor::new("categories", "Categories Grid", 2),
            ComponentDescriptor::new("featured", "Featured Products", 3),
            ComponentDescriptor::new("footer", "Footer", 4),
        ];
        let mut theme = Theme::new();
        theme.insert("primaryColor".into(), "#3B82F6".into());
        theme.insert("backgroundColor".into(), "#F3F4F6".into());
        Self { components, theme }
    }

    #[must_use]
    pub fn path() -> DocPath {
        DocPath::new(SETTINGS_COLLECTION, LAYOUT_DOC_ID)
    }

    #[must_use]
    pub fn component(&self, id: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut ComponentDescriptor> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Visible components sorted by ascending `order`. Ties keep document order.
    #[must_use]
    pub fn visible_in_order(&self) -> Vec<&ComponentDescriptor> {
        let mut visible = self.components.iter().filter(|c| c.visible).collect::<Vec<_>>();
        visible.sort_by_key(|c| c.order);
        visible
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
