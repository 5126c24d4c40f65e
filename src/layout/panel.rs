//! Settings panel: the editing form bound to the current selection.
//!
//! With a component selected, the panel shows that type's field schema with
//! current values. A field edit is merged into the component's full settings
//! object here, and only the full object is handed to the settings-change
//! callback; the store never sees per-field patches. With nothing selected,
//! the panel shows one color editor per theme key.

use leptos::prelude::*;
use serde::Serialize;

use super::document::{ComponentDescriptor, LayoutDocument, Settings, Theme};
use super::registry::{FieldKind, schema_for};
use crate::frame::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("component {component} has no setting named {key}")]
    UnknownField { component: String, key: String },
    #[error("setting {key} expects {expected}")]
    InvalidValue { key: String, expected: &'static str },
    #[error("theme color {0} cannot be empty")]
    EmptyThemeValue(String),
}

impl ErrorCode for PanelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownField { .. } => "E_UNKNOWN_FIELD",
            Self::InvalidValue { .. } => "E_INVALID_VALUE",
            Self::EmptyThemeValue(_) => "E_EMPTY_THEME_VALUE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Stored value, or the registry default when unset.
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeColorView {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PanelView {
    Component { component_id: String, name: String, fields: Vec<FieldView> },
    Theme { colors: Vec<ThemeColorView> },
}

/// Build the panel for the current selection.
#[must_use]
pub fn view(layout: &LayoutDocument, selected: Option<&ComponentDescriptor>) -> PanelView {
    let Some(component) = selected else {
        return theme_view(&layout.theme);
    };

    let schema = schema_for(component);
    let defaults = (schema.defaults)();
    let fields = schema
        .fields
        .iter()
        .map(|field| FieldView {
            key: field.key,
            label: field.label,
            kind: field.kind,
            value: component
                .settings
                .get(field.key)
                .or_else(|| defaults.get(field.key))
                .cloned()
                .unwrap_or(serde_json::Value::Null),
        })
        .collect();

    PanelView::Component { component_id: component.id.clone(), name: component.name.clone(), fields }
}

fn theme_view(theme: &Theme) -> PanelView {
    let colors = theme
        .iter()
        .map(|(key, value)| ThemeColorView { key: key.clone(), value: value.clone() })
        .collect();
    PanelView::Theme { colors }
}

// =============================================================================
// EDITS
// =============================================================================

/// Merge one field edit into the component's full settings object.
///
/// A `null` value removes the key so the renderer default applies again.
///
/// # Errors
///
/// Returns `UnknownField` if the type has no such field and `InvalidValue`
/// if the JSON type does not match the field kind.
pub fn merge_field(component: &ComponentDescriptor, key: &str, value: serde_json::Value) -> Result<Settings, PanelError> {
    let schema = schema_for(component);
    let Some(field) = schema.field(key) else {
        return Err(PanelError::UnknownField { component: component.id.clone(), key: key.to_owned() });
    };

    let mut settings = component.settings.clone();
    if value.is_null() {
        settings.remove(key);
        return Ok(settings);
    }

    let expected = match field.kind {
        FieldKind::Toggle if !value.is_boolean() => Some("a boolean"),
        FieldKind::List if !value.as_array().is_some_and(|items| items.iter().all(serde_json::Value::is_object)) => {
            Some("an array of objects")
        }
        FieldKind::Color | FieldKind::Text | FieldKind::Markup | FieldKind::Image if !value.is_string() => {
            Some("a string")
        }
        _ => None,
    };
    if let Some(expected) = expected {
        return Err(PanelError::InvalidValue { key: key.to_owned(), expected });
    }

    settings.insert(key.to_owned(), value);
    Ok(settings)
}

/// Merge a field edit and hand the full settings object to the callback.
///
/// # Errors
///
/// See [`merge_field`]; the callback is not invoked on error.
pub fn dispatch_edit<F>(
    component: &ComponentDescriptor,
    key: &str,
    value: serde_json::Value,
    on_settings_change: F,
) -> Result<(), PanelError>
where
    F: FnOnce(&str, Settings),
{
    let settings = merge_field(component, key, value)?;
    on_settings_change(&component.id, settings);
    Ok(())
}

/// Validate a theme color edit and hand it to the theme-change callback.
///
/// # Errors
///
/// Returns `EmptyThemeValue` for blank colors.
pub fn dispatch_theme_edit<F>(key: &str, value: &str, on_theme_change: F) -> Result<(), PanelError>
where
    F: FnOnce(&str, &str),
{
    let value = value.trim();
    if value.is_empty() {
        return Err(PanelError::EmptyThemeValue(key.to_owned()));
    }
    on_theme_change(key, value);
    Ok(())
}

// =============================================================================
// HTML
// =============================================================================

/// Render the panel as an HTML form fragment.
#[must_use]
pub fn render_html(panel: &PanelView) -> String {
    let form = match panel {
        PanelView::Component { component_id, name, fields } => view! {
            <form data-settings-for=component_id.clone()>
                <h4 class="text-sm font-medium mb-2">{name.clone()}</h4>
                {fields.iter().map(field_input).collect_view()}
            </form>
        }
        .into_any(),
        PanelView::Theme { colors } => {
            let inputs = colors
                .iter()
                .map(|color| {
                    view! {
                        <label>
                            {color.key.clone()}
                            <input type="color" name=color.key.clone() value=color.value.clone()/>
                        </label>
                    }
                })
                .collect_view();
            view! {
                <form data-theme-editor="">
                    <h4 class="text-sm font-medium mb-2">"Theme Colors"</h4>
                    {inputs}
                </form>
            }
            .into_any()
        }
    };

    view! {
        <div class="w-80 bg-white border-l p-4">
            <h3 class="text-sm font-medium mb-4">"Settings"</h3>
            {form}
        </div>
    }
    .to_html()
}

fn field_input(field: &FieldView) -> AnyView {
    let label = field.label;
    let key = field.key;
    let text = match &field.value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };
    let input = match field.kind {
        FieldKind::Color => view! { <input type="color" name=key value=text/> }.into_any(),
        FieldKind::Text | FieldKind::Image => view! { <input type="text" name=key value=text/> }.into_any(),
        FieldKind::Markup => view! { <textarea name=key>{text}</textarea> }.into_any(),
        FieldKind::Toggle => {
            let checked = field.value.as_bool().unwrap_or(false);
            view! { <input type="checkbox" name=key checked=checked/> }.into_any()
        }
        FieldKind::List => view! { <textarea name=key data-json="">{text}</textarea> }.into_any(),
    };
    view! { <label>{label}{input}</label> }.into_any()
}

#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;
