//! Static content pages at `static_pages/{pageId}`.
//!
//! Pages are created lazily: the first read of a missing page writes its
//! default text. Unknown page ids default to empty content.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::now_rfc3339;
use crate::docstore::{self, DocError, DocPath, DocumentStore};
use crate::frame::ErrorCode;

pub const STATIC_PAGES_COLLECTION: &str = "static_pages";

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("invalid page id: {0:?}")]
    InvalidId(String),
    #[error(transparent)]
    Store(#[from] DocError),
}

impl ErrorCode for PageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "E_INVALID_PAGE_ID",
            Self::Store(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::InvalidId(_) => false,
            Self::Store(e) => e.retryable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Default text for the well-known pages.
#[must_use]
pub fn default_content(page_id: &str) -> &'static str {
    match page_id {
        "about" => "Welcome to our store! We are committed to providing quality products and excellent service.",
        "privacy" => "Your privacy is important to us. This privacy policy outlines how we collect and use your data.",
        "terms" => "Please read these terms and conditions carefully before using our services.",
        "contact" => "Get in touch with us! We'd love to hear from you.",
        _ => "",
    }
}

fn page_path(page_id: &str) -> Result<DocPath, PageError> {
    let valid = !page_id.is_empty()
        && page_id.len() <= 64
        && page_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(PageError::InvalidId(page_id.to_owned()));
    }
    Ok(DocPath::new(STATIC_PAGES_COLLECTION, page_id))
}

/// Read a page, creating it with its default text if missing.
///
/// # Errors
///
/// Returns `InvalidId` for ids outside `[A-Za-z0-9_-]{1,64}` and `Store`
/// on read failure. A failed default write is only logged.
pub async fn load(docs: &dyn DocumentStore, page_id: &str) -> Result<StaticPage, PageError> {
    let path = page_path(page_id)?;
    if let Some(page) = docstore::get_typed::<StaticPage>(docs, &path).await? {
        return Ok(page);
    }

    let page = StaticPage { content: default_content(page_id).to_owned(), updated_at: now_rfc3339() };
    let written = match docstore::encode(&path, &page) {
        Ok(value) => docs.set(&path, value).await,
        Err(e) => Err(e),
    };
    match written {
        Ok(()) => info!(%path, "created static page"),
        Err(e) => warn!(%path, error = %e, "failed to create static page"),
    }
    Ok(page)
}

/// Replace a page's content.
///
/// # Errors
///
/// Returns `InvalidId` or the store error if the write fails.
pub async fn save(docs: &dyn DocumentStore, page_id: &str, content: String) -> Result<StaticPage, PageError> {
    let path = page_path(page_id)?;
    let page = StaticPage { content, updated_at: now_rfc3339() };
    let value = docstore::encode(&path, &page)?;
    docs.set(&path, value).await?;
    Ok(page)
}

#[cfg(test)]
#[path = "static_pages_test.rs"]
mod tests;
