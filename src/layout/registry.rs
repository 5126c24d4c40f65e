//! Component registry: one entry per component type.
//!
//! The descriptor `id` selects the entry. Each entry bundles the type's
//! default settings, its renderer and its settings-form schema, so adding a
//! component type means adding one `ComponentSchema` and one `ComponentKind`
//! variant. Ids with no entry resolve to the placeholder.

use leptos::prelude::AnyView;
use serde::Serialize;

use super::document::{ComponentDescriptor, Settings};
use super::render::{self, CategoriesSettings, FeaturedSettings, FooterSettings, HeaderSettings, HeroSettings};

/// How a settings field is edited in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Color,
    Text,
    /// Raw markup emitted verbatim by the renderer.
    Markup,
    Image,
    Toggle,
    /// JSON array of objects, replaced as a whole.
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind) -> FieldSchema {
    FieldSchema { key, label, kind }
}

pub struct ComponentSchema {
    pub tag: &'static str,
    pub defaults: fn() -> Settings,
    pub render: fn(&ComponentDescriptor) -> AnyView,
    pub fields: &'static [FieldSchema],
}

impl ComponentSchema {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&'static FieldSchema> {
        self.fields.iter().find(|f| f.key == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Header,
    Hero,
    Categories,
    Featured,
    Footer,
    Placeholder,
}

impl ComponentKind {
    pub const KNOWN: [ComponentKind; 5] = [Self::Header, Self::Hero, Self::Categories, Self::Featured, Self::Footer];

    #[must_use]
    pub fn from_id(id: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.schema().tag == id)
            .unwrap_or(Self::Placeholder)
    }

    #[must_use]
    pub fn schema(self) -> &'static ComponentSchema {
        match self {
            Self::Header => &HEADER,
            Self::Hero => &HERO,
            Self::Categories => &CATEGORIES,
            Self::Featured => &FEATURED,
            Self::Footer => &FOOTER,
            Self::Placeholder => &PLACEHOLDER,
        }
    }
}

/// Registry entry for a component, placeholder included.
#[must_use]
pub fn schema_for(component: &ComponentDescriptor) -> &'static ComponentSchema {
    ComponentKind::from_id(&component.id).schema()
}

/// Render one component through its registry entry.
#[must_use]
pub fn render_component(component: &ComponentDescriptor) -> AnyView {
    (schema_for(component).render)(component)
}

// =============================================================================
// ENTRIES
// =============================================================================

static HEADER: ComponentSchema = ComponentSchema {
    tag: "header",
    defaults: || render::to_settings(&HeaderSettings::default()),
    render: render::header,
    fields: &[
        field("logo", "Logo", FieldKind::Image),
        field("backgroundColor", "Background Color", FieldKind::Color),
        field("textColor", "Text Color", FieldKind::Color),
        field("showSearch", "Show Search", FieldKind::Toggle),
        field("announcement", "Announcement", FieldKind::Markup),
    ],
};

static HERO: ComponentSchema = ComponentSchema {
    tag: "hero",
    defaults: || render::to_settings(&HeroSettings::default()),
    render: render::hero,
    fields: &[
        field("backgroundImage", "Background Image", FieldKind::Image),
        field("backgroundColor", "Background Color", FieldKind::Color),
        field("heading", "Heading", FieldKind::Markup),
        field("subheading", "Subheading", FieldKind::Markup),
    ],
};

static CATEGORIES: ComponentSchema = ComponentSchema {
    tag: "categories",
    defaults: || render::to_settings(&CategoriesSettings::default()),
    render: render::categories,
    fields: &[field("categories", "Categories", FieldKind::List)],
};

static FEATURED: ComponentSchema = ComponentSchema {
    tag: "featured",
    defaults: || render::to_settings(&FeaturedSettings::default()),
    render: render::featured,
    fields: &[field("products", "Products", FieldKind::List)],
};

static FOOTER: ComponentSchema = ComponentSchema {
    tag: "footer",
    defaults: || render::to_settings(&FooterSettings::default()),
    render: render::footer,
    fields: &[
        field("logo", "Logo", FieldKind::Image),
        field("backgroundColor", "Background Color", FieldKind::Color),
        field("textColor", "Text Color", FieldKind::Color),
        field("copyrightText", "Copyright Text", FieldKind::Markup),
    ],
};

static PLACEHOLDER: ComponentSchema = ComponentSchema {
    tag: "",
    defaults: Settings::new,
    render: render::placeholder,
    fields: &[],
};

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
