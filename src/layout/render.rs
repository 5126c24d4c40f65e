//! Component renderers: settings in, views out.
//!
//! DESIGN
//! ======
//! Every renderer is a pure function over a `ComponentDescriptor`. Settings are
//! resolved into a typed struct whose `Default` carries the documented
//! per-field defaults. Resolution is lenient: a missing key takes its default,
//! and a key holding the wrong JSON type is dropped on its own without
//! resetting the other fields.
//!
//! Each renderer is a leptos component. Fields documented as raw markup
//! (`announcement`, `heading`, `subheading`, `copyrightText`) go through
//! `inner_html`; every other string is escaped by the view layer.

use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::document::{ComponentDescriptor, Settings};

pub const DEFAULT_DARK: &str = "#1F2937";
pub const DEFAULT_LIGHT_TEXT: &str = "#FFFFFF";
pub const DEFAULT_HEADING: &str = "Welcome";
pub const DEFAULT_SUBHEADING: &str = "Discover our products";
pub const DEFAULT_COPYRIGHT: &str = "© 2024 Your Store. All rights reserved.";

// =============================================================================
// SETTINGS SCHEMAS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub background_color: String,
    pub text_color: String,
    pub show_search: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcement: Option<String>,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            logo: None,
            background_color: DEFAULT_DARK.into(),
            text_color: DEFAULT_LIGHT_TEXT.into(),
            show_search: true,
            announcement: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    pub background_color: String,
    pub heading: String,
    pub subheading: String,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            background_image: None,
            background_color: DEFAULT_DARK.into(),
            heading: DEFAULT_HEADING.into(),
            subheading: DEFAULT_SUBHEADING.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoriesSettings {
    pub categories: Vec<CategoryCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturedProduct {
    pub name: String,
    /// Number or preformatted string; anything else renders empty.
    pub price: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturedSettings {
    pub products: Vec<FeaturedProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub background_color: String,
    pub text_color: String,
    pub copyright_text: String,
}

impl Default for FooterSettings {
    fn default() -> Self {
        Self {
            logo: None,
            background_color: DEFAULT_DARK.into(),
            text_color: DEFAULT_LIGHT_TEXT.into(),
            copyright_text: DEFAULT_COPYRIGHT.into(),
        }
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Resolve a typed settings struct from a possibly partial, possibly
/// malformed settings map. Never fails.
pub fn resolve<T>(settings: &Settings) -> T
where
    T: DeserializeOwned + Default,
{
    if let Ok(parsed) = serde_json::from_value::<T>(serde_json::Value::Object(settings.clone())) {
        return parsed;
    }

    let mut kept = Settings::new();
    for (key, value) in settings {
        let mut candidate = kept.clone();
        candidate.insert(key.clone(), value.clone());
        if serde_json::from_value::<T>(serde_json::Value::Object(candidate.clone())).is_ok() {
            kept = candidate;
        } else {
            debug!(key = %key, "ignoring malformed component setting");
        }
    }
    serde_json::from_value(serde_json::Value::Object(kept)).unwrap_or_default()
}

/// Serialize a settings struct back into the document's map form.
pub fn to_settings<T: Serialize>(value: &T) -> Settings {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => Settings::new(),
    }
}

// =============================================================================
// RENDERERS
// =============================================================================

const CATEGORY_CARD: &str = "aspect-square bg-gray-100 rounded-lg flex flex-col items-center justify-center";

pub fn header(component: &ComponentDescriptor) -> AnyView {
    view! { <HeaderSection settings=resolve(&component.settings)/> }.into_any()
}

pub fn hero(component: &ComponentDescriptor) -> AnyView {
    view! { <HeroSection settings=resolve(&component.settings)/> }.into_any()
}

pub fn categories(component: &ComponentDescriptor) -> AnyView {
    view! { <CategoriesSection settings=resolve(&component.settings)/> }.into_any()
}

pub fn featured(component: &ComponentDescriptor) -> AnyView {
    view! { <FeaturedSection settings=resolve(&component.settings)/> }.into_any()
}

pub fn footer(component: &ComponentDescriptor) -> AnyView {
    view! { <FooterSection settings=resolve(&component.settings)/> }.into_any()
}

/// Fallback for ids with no registry entry.
pub fn placeholder(component: &ComponentDescriptor) -> AnyView {
    view! { <PlaceholderCard name=component.name.clone()/> }.into_any()
}

#[component]
fn HeaderSection(settings: HeaderSettings) -> impl IntoView {
    let HeaderSettings { logo, background_color, text_color, show_search, announcement } = settings;
    let banner = non_empty(announcement).map(|markup| {
        view! { <div class="bg-blue-600 text-white text-center text-sm py-2 mb-4" inner_html=markup></div> }
    });
    let logo = match non_empty(logo) {
        Some(src) => view! { <img src=src alt="Logo" class="h-8"/> }.into_any(),
        None => view! { <span class="text-xl font-bold">"Logo"</span> }.into_any(),
    };
    let search = show_search.then(|| {
        view! {
            <div class="relative flex-1 max-w-lg mx-8">
                <input type="search" placeholder="Search products..." class="w-full rounded-md border-gray-300 shadow-sm"/>
            </div>
        }
    });

    view! {
        <div class="relative p-4" style=format!("background-color: {background_color}; color: {text_color}")>
            {banner}
            <div class="flex items-center justify-between">
                {logo}
                {search}
            </div>
        </div>
    }
}

#[component]
fn HeroSection(settings: HeroSettings) -> impl IntoView {
    let HeroSettings { background_image, background_color, heading, subheading } = settings;
    let image = non_empty(background_image).map_or_else(|| "none".to_owned(), |url| format!("url({url})"));

    view! {
        <div
            class="relative h-64 bg-cover bg-center flex items-center justify-center"
            style=format!("background-image: {image}; background-color: {background_color}")
        >
            <div class="text-center text-white">
                <h1 class="text-4xl font-bold mb-4" inner_html=heading></h1>
                <p class="text-xl" inner_html=subheading></p>
            </div>
        </div>
    }
}

#[component]
fn CategoriesSection(settings: CategoriesSettings) -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 md:grid-cols-3 gap-4 p-4">
            {settings.categories.into_iter().map(category_card).collect_view()}
        </div>
    }
}

fn category_card(category: CategoryCard) -> AnyView {
    let CategoryCard { name, image, description, path } = category;
    let image = non_empty(image).map(|src| view! { <img src=src alt=name.clone() class="h-16 mb-2"/> });
    let description = non_empty(description).map(|text| view! { <p class="text-sm text-gray-600">{text}</p> });
    let body = view! {
        {image}
        <span class="text-lg font-medium">{name}</span>
        {description}
    };

    match non_empty(path) {
        Some(href) => view! { <a href=href class=CATEGORY_CARD>{body}</a> }.into_any(),
        None => view! { <div class=CATEGORY_CARD>{body}</div> }.into_any(),
    }
}

#[component]
fn FeaturedSection(settings: FeaturedSettings) -> impl IntoView {
    let cards = settings
        .products
        .into_iter()
        .map(|product| {
            let price = format!("${}", format_price(&product.price));
            view! {
                <div class="bg-white rounded-lg shadow p-4">
                    <div class="aspect-square bg-gray-100 rounded mb-2"></div>
                    <h3 class="font-medium">{product.name}</h3>
                    <p class="text-gray-600">{price}</p>
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="p-4">
            <h2 class="text-2xl font-bold mb-4">"Featured Products"</h2>
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">{cards}</div>
        </div>
    }
}

#[component]
fn FooterSection(settings: FooterSettings) -> impl IntoView {
    let FooterSettings { logo, background_color, text_color, copyright_text } = settings;
    let logo = non_empty(logo).map(|src| view! { <img src=src alt="Footer Logo" class="h-8 mb-4"/> });

    view! {
        <div class="p-4" style=format!("background-color: {background_color}; color: {text_color}")>
            {logo}
            <p class="text-sm" inner_html=copyright_text></p>
        </div>
    }
}

#[component]
fn PlaceholderCard(name: String) -> impl IntoView {
    view! {
        <div class="p-4 border-2 border-dashed border-gray-300 rounded-lg">
            <span class="text-gray-500">{format!("Component: {name}")}</span>
        </div>
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn format_price(price: &serde_json::Value) -> String {
    match price {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else {
                n.as_f64().map(|f| format!("{f:.2}")).unwrap_or_default()
            }
        }
        serde_json::Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
