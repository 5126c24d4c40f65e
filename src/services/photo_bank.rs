//! Photo bank: reusable image metadata in the `photo_bank` collection.
//!
//! Only metadata is stored here; image bytes live in external object
//! storage and are referenced by `url`.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{now_rfc3339, parse_rfc3339};
use crate::docstore::{self, DocError, DocPath, DocumentStore};
use crate::frame::ErrorCode;

pub const PHOTO_BANK_COLLECTION: &str = "photo_bank";
pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("photo not found: {0}")]
    NotFound(String),
    #[error("invalid photo: {0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Store(#[from] DocError),
}

impl ErrorCode for PhotoError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_PHOTO_NOT_FOUND",
            Self::Invalid(_) => "E_PHOTO_INVALID",
            Self::Store(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.retryable())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub name: String,
    pub url: String,
    pub category: String,
    pub created_at: String,
    pub last_used: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPhoto {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
}

fn photo_path(id: &str) -> DocPath {
    DocPath::new(PHOTO_BANK_COLLECTION, id)
}

/// Record a photo's metadata under a fresh id.
///
/// # Errors
///
/// Returns `Invalid` for an empty url, or the store error.
pub async fn save(docs: &dyn DocumentStore, photo: NewPhoto) -> Result<Photo, PhotoError> {
    if photo.url.trim().is_empty() {
        return Err(PhotoError::Invalid("url is required"));
    }
    let now = now_rfc3339();
    let category = photo.category.filter(|c| !c.trim().is_empty()).unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());
    let record = Photo { id: Uuid::new_v4().to_string(), name: photo.name, url: photo.url, category, created_at: now.clone(), last_used: now };

    let path = photo_path(&record.id);
    docs.set(&path, docstore::encode(&path, &record)?).await?;
    Ok(record)
}

/// All photos, most recently used first, optionally within one category.
///
/// # Errors
///
/// Returns the store error if listing fails.
pub async fn list(docs: &dyn DocumentStore, category: Option<&str>) -> Result<Vec<Photo>, PhotoError> {
    let mut photos = Vec::new();
    for (id, value) in docs.list(PHOTO_BANK_COLLECTION).await? {
        match docstore::decode::<Photo>(&photo_path(&id), value) {
            Ok(photo) if category.is_none_or(|c| photo.category == c) => photos.push(photo),
            Ok(_) => {}
            Err(e) => warn!(%id, error = %e, "skipping undecodable photo"),
        }
    }
    photos.sort_by_key(|p| Reverse(parse_rfc3339(&p.last_used)));
    Ok(photos)
}

/// Remove one photo and return its metadata.
///
/// # Errors
///
/// Returns `NotFound` if the photo does not exist.
pub async fn delete(docs: &dyn DocumentStore, id: &str) -> Result<Photo, PhotoError> {
    let path = photo_path(id);
    let Some(photo) = docstore::get_typed::<Photo>(docs, &path).await? else {
        return Err(PhotoError::NotFound(id.to_owned()));
    };
    docs.delete(&path).await?;
    Ok(photo)
}

/// Mark a photo as just used. Missing photos and failures are only logged.
pub async fn touch(docs: &dyn DocumentStore, id: &str) {
    let path = photo_path(id);
    let result: Result<(), DocError> = async {
        let Some(mut photo) = docstore::get_typed::<Photo>(docs, &path).await? else {
            debug!(%path, "touch on missing photo ignored");
            return Ok(());
        };
        photo.last_used = now_rfc3339();
        docs.set(&path, docstore::encode(&path, &photo)?).await
    }
    .await;

    if let Err(e) = result {
        warn!(%path, error = %e, "failed to update photo last-used time");
    }
}

/// Remove every photo. Returns the number removed.
///
/// # Errors
///
/// Returns the store error; photos deleted before the failure stay deleted.
pub async fn clear(docs: &dyn DocumentStore) -> Result<usize, PhotoError> {
    let ids = docs.list(PHOTO_BANK_COLLECTION).await?;
    for (id, _) in &ids {
        docs.delete(&photo_path(id)).await?;
    }
    Ok(ids.len())
}

#[cfg(test)]
#[path = "photo_bank_test.rs"]
mod tests;
