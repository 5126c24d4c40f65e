//! Store-wide settings at `settings/store`: feature flags, theme, identity.
//!
//! A missing document is created from defaults on first read. Stored
//! documents may be partial; every absent key takes its default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::docstore::{self, DocError, DocPath, DocumentStore};
use crate::layout::document::SETTINGS_COLLECTION;

pub const STORE_DOC_ID: &str = "store";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Features {
    pub cart: bool,
    pub user_accounts: bool,
    pub reviews: bool,
    pub wishlist: bool,
    pub age_verification: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self { cart: false, user_accounts: true, reviews: false, wishlist: false, age_verification: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreInfo {
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub phone: String,
    pub address: String,
}

impl Default for StoreInfo {
    fn default() -> Self {
        Self {
            name: "Bullocks Smoke Shop".into(),
            description: "Premium smoke shop products".into(),
            contact_email: "support@bullocksmokeshop.com".into(),
            phone: String::new(),
            address: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub features: Features,
    pub theme: BTreeMap<String, String>,
    pub store: StoreInfo,
}

impl Default for StoreSettings {
    fn default() -> Self {
        let theme = [("primaryColor", "#3B82F6"), ("backgroundColor", "#F3F4F6"), ("accentColor", "#10B981")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Self { features: Features::default(), theme, store: StoreInfo::default() }
    }
}

impl StoreSettings {
    #[must_use]
    pub fn path() -> DocPath {
        DocPath::new(SETTINGS_COLLECTION, STORE_DOC_ID)
    }

    /// Theme background color, if configured.
    #[must_use]
    pub fn background_color(&self) -> Option<&str> {
        self.theme.get("backgroundColor").map(String::as_str)
    }
}

/// Read the store settings, creating the document from defaults if missing.
///
/// A failed default write is logged; the defaults are still returned.
///
/// # Errors
///
/// Returns the store error on read failure, or `Decode` for a document with
/// mistyped fields.
pub async fn load(docs: &dyn DocumentStore) -> Result<StoreSettings, DocError> {
    let path = StoreSettings::path();
    if let Some(settings) = docstore::get_typed::<StoreSettings>(docs, &path).await? {
        return Ok(settings);
    }

    let defaults = StoreSettings::default();
    match docstore::encode(&path, &defaults) {
        Ok(value) => match docs.set(&path, value).await {
            Ok(()) => info!(%path, "created default store settings"),
            Err(e) => warn!(%path, error = %e, "failed to create default store settings"),
        },
        Err(e) => warn!(%path, error = %e, "failed to encode default store settings"),
    }
    Ok(defaults)
}

/// Read the store settings, falling back to defaults on any failure.
pub async fn load_or_default(docs: &dyn DocumentStore) -> StoreSettings {
    match load(docs).await {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "using default store settings");
            StoreSettings::default()
        }
    }
}

/// Overwrite the store settings document.
///
/// # Errors
///
/// Returns the store error if the write fails.
pub async fn save(docs: &dyn DocumentStore, settings: &StoreSettings) -> Result<(), DocError> {
    let path = StoreSettings::path();
    let value = docstore::encode(&path, settings)?;
    docs.set(&path, value).await
}

#[cfg(test)]
#[path = "store_settings_test.rs"]
mod tests;
