//! Document store client: the injected handle to the hosted document database.
//!
//! DESIGN
//! ======
//! Every persisted concern (layout, store settings, static pages, products,
//! photo bank) is a JSON document addressed by `collection/id`. Services never
//! talk to a database directly; they receive an `Arc<dyn DocumentStore>` at
//! startup. Writes are whole-document overwrites. Readers that need live
//! updates take a `Subscription`, which yields every change to one document
//! regardless of which process wrote it.
//!
//! LIFECYCLE
//! =========
//! `main` constructs exactly one store (Postgres when `DATABASE_URL` is set,
//! in-memory otherwise) and calls `close` during graceful shutdown.

pub mod memory;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::frame::ErrorCode;

/// Capacity of the per-store change fan-out channel.
pub(crate) const CHANGE_CAPACITY: usize = 256;

// =============================================================================
// TYPES
// =============================================================================

/// Address of one document: `collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    collection: String,
    id: String,
}

impl DocPath {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self { collection: collection.into(), id: id.into() }
    }

    /// Parse the `collection/id` form used in change notifications.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (collection, id) = raw.split_once('/')?;
        if collection.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self::new(collection, id))
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// One observed change. `value` is `None` when the document was deleted.
#[derive(Debug, Clone)]
pub struct DocChange {
    pub path: DocPath,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid document at {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for DocError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "E_STORE_UNAVAILABLE",
            Self::Decode { .. } => "E_DOCUMENT_DECODE",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        !matches!(self, Self::Decode { .. })
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document. `Ok(None)` means it does not exist.
    async fn get(&self, path: &DocPath) -> Result<Option<serde_json::Value>, DocError>;

    /// Overwrite one document, creating it if needed.
    async fn set(&self, path: &DocPath, value: serde_json::Value) -> Result<(), DocError>;

    /// Overwrite several documents. Either all writes land or none do.
    async fn set_batch(&self, writes: Vec<(DocPath, serde_json::Value)>) -> Result<(), DocError>;

    /// Delete one document. Deleting a missing document is not an error.
    async fn delete(&self, path: &DocPath) -> Result<(), DocError>;

    /// List every document in a collection as `(id, value)` pairs.
    async fn list(&self, collection: &str) -> Result<Vec<(String, serde_json::Value)>, DocError>;

    /// Observe changes to one document.
    fn subscribe(&self, path: &DocPath) -> Subscription;

    /// Release connections and background tasks.
    async fn close(&self) {}
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Point read a subscription falls back on after its change feed overflowed.
#[async_trait::async_trait]
pub(crate) trait Reread: Send + Sync {
    async fn reread(&self, path: &DocPath) -> Result<Option<serde_json::Value>, DocError>;
}

/// Push subscription to a single document.
pub struct Subscription {
    path: DocPath,
    rx: broadcast::Receiver<DocChange>,
    source: Arc<dyn Reread>,
}

impl Subscription {
    #[must_use]
    pub(crate) fn new(path: DocPath, rx: broadcast::Receiver<DocChange>, source: Arc<dyn Reread>) -> Self {
        Self { path, rx, source }
    }

    #[must_use]
    pub fn path(&self) -> &DocPath {
        &self.path
    }

    /// Wait for the next change to the watched document.
    ///
    /// Returns `None` once the store has shut down. The outer `Option` is the
    /// stream, the inner one the document (`None` = deleted).
    ///
    /// When the fan-out channel overflows, the dropped events may include a
    /// write to the watched document. The subscription then skips to the live
    /// tail and yields the document's current value read from the store.
    pub async fn next(&mut self) -> Option<Option<serde_json::Value>> {
        loop {
            match self.rx.recv().await {
                Ok(change) if change.path == self.path => return Some(change.value),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(path = %self.path, skipped, "subscription lagged; re-reading document");
                    // Retained backlog may hold values older than the re-read.
                    self.rx = self.rx.resubscribe();
                    match self.source.reread(&self.path).await {
                        Ok(value) => return Some(value),
                        Err(e) => warn!(path = %self.path, error = %e, "re-read after lag failed"),
                    }
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

// =============================================================================
// TYPED HELPERS
// =============================================================================

/// Read and decode one document.
///
/// # Errors
///
/// Returns the store error, or `Decode` if the document has the wrong shape.
pub async fn get_typed<T: DeserializeOwned>(store: &dyn DocumentStore, path: &DocPath) -> Result<Option<T>, DocError> {
    let Some(value) = store.get(path).await? else {
        return Ok(None);
    };
    decode(path, value).map(Some)
}

/// Decode a raw document value.
///
/// # Errors
///
/// Returns `Decode` if the value does not match `T`.
pub fn decode<T: DeserializeOwned>(path: &DocPath, value: serde_json::Value) -> Result<T, DocError> {
    serde_json::from_value(value).map_err(|source| DocError::Decode { path: path.to_string(), source })
}

/// Encode a value for storage.
///
/// # Errors
///
/// Returns `Decode` if the value cannot be represented as JSON.
pub fn encode<T: serde::Serialize>(path: &DocPath, value: &T) -> Result<serde_json::Value, DocError> {
    serde_json::to_value(value).map_err(|source| DocError::Decode { path: path.to_string(), source })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
