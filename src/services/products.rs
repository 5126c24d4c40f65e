//! Product catalog over the `products` collection.
//!
//! DESIGN
//! ======
//! The catalog keeps an in-memory copy of the last listing. Create, update
//! and delete change that copy first, then write the document; if the write
//! fails the copy is restored and the error is returned. Listing always
//! reads the store and replaces the copy.
//!
//! An empty, unfiltered catalog is seeded with two sample products.

use std::cmp::Reverse;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use super::{now_rfc3339, parse_rfc3339};
use crate::docstore::{self, DocError, DocPath, DocumentStore};
use crate::frame::ErrorCode;

pub const PRODUCTS_COLLECTION: &str = "products";

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("product not found: {0}")]
    NotFound(String),
    #[error("invalid product: {0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Store(#[from] DocError),
}

impl ErrorCode for ProductError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_PRODUCT_NOT_FOUND",
            Self::Invalid(_) => "E_PRODUCT_INVALID",
            Self::Store(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.retryable())
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// Stored product document. Unknown columns (from imports) are preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_in_stock() -> bool {
    true
}

/// Accept a number or a numeric string, as spreadsheets produce both.
fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().trim_start_matches('$').parse().map_err(serde::de::Error::custom),
    }
}

/// A product with its document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(flatten)]
    pub record: ProductRecord,
}

/// Editable product fields as submitted by the admin form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub image: Option<String>,
}

fn validate(name: &str, price: f64) -> Result<(), ProductError> {
    if name.trim().is_empty() {
        return Err(ProductError::Invalid("name is required"));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(ProductError::Invalid("price must be a non-negative number"));
    }
    Ok(())
}

impl ProductDraft {
    fn validate(&self) -> Result<(), ProductError> {
        validate(&self.name, self.price)
    }
}

impl ProductRecord {
    pub(crate) fn validate(&self) -> Result<(), ProductError> {
        validate(&self.name, self.price)
    }

    fn from_draft(draft: ProductDraft, created_at: String, updated_at: String) -> Self {
        Self {
            name: draft.name.trim().to_owned(),
            description: draft.description,
            price: draft.price,
            category: draft.category,
            in_stock: draft.in_stock,
            image: draft.image.filter(|url| !url.is_empty()),
            created_at,
            updated_at,
            extra: serde_json::Map::new(),
        }
    }
}

pub(crate) fn product_path(id: &str) -> DocPath {
    DocPath::new(PRODUCTS_COLLECTION, id)
}

fn sample_products() -> Vec<ProductRecord> {
    let now = now_rfc3339();
    [
        ("Sample Product 1", "This is a sample product description.", 19.99),
        ("Sample Product 2", "Another sample product description.", 29.99),
    ]
    .into_iter()
    .map(|(name, description, price)| ProductRecord {
        name: name.into(),
        description: description.into(),
        price,
        category: "accessories".into(),
        in_stock: true,
        image: None,
        created_at: now.clone(),
        updated_at: now.clone(),
        extra: serde_json::Map::new(),
    })
    .collect()
}

/// Newest first by `createdAt`; unparsable timestamps sort last.
fn sort_newest_first(products: &mut [Product]) {
    products.sort_by_key(|p| Reverse(parse_rfc3339(&p.record.created_at)));
}

// =============================================================================
// CATALOG
// =============================================================================

pub struct ProductCatalog {
    docs: Arc<dyn DocumentStore>,
    cached: RwLock<Vec<Product>>,
}

impl ProductCatalog {
    #[must_use]
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs, cached: RwLock::new(Vec::new()) }
    }

    /// Snapshot of the in-memory catalog.
    pub async fn cached(&self) -> Vec<Product> {
        self.cached.read().await.clone()
    }

    /// List products, newest first, optionally filtered by category.
    ///
    /// Undecodable documents are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns the store error if listing or seeding fails.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, ProductError> {
        let mut all = self.load_all().await?;
        if all.is_empty() && category.is_none() {
            self.seed().await?;
            all = self.load_all().await?;
        }
        sort_newest_first(&mut all);
        *self.cached.write().await = all.clone();

        Ok(match category {
            Some(category) => all.into_iter().filter(|p| p.record.category == category).collect(),
            None => all,
        })
    }

    async fn load_all(&self) -> Result<Vec<Product>, DocError> {
        let rows = self.docs.list(PRODUCTS_COLLECTION).await?;
        let mut products = Vec::with_capacity(rows.len());
        for (id, value) in rows {
            let path = product_path(&id);
            match docstore::decode::<ProductRecord>(&path, value) {
                Ok(record) => products.push(Product { id, record }),
                Err(e) => warn!(%path, error = %e, "skipping undecodable product"),
            }
        }
        Ok(products)
    }

    async fn seed(&self) -> Result<(), DocError> {
        let mut writes = Vec::new();
        for record in sample_products() {
            let path = product_path(&Uuid::new_v4().to_string());
            writes.push((path.clone(), docstore::encode(&path, &record)?));
        }
        info!(count = writes.len(), "seeding sample products");
        self.docs.set_batch(writes).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for bad drafts, or the store error after rolling
    /// back the in-memory catalog.
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, ProductError> {
        draft.validate()?;
        let now = now_rfc3339();
        let product = Product { id: Uuid::new_v4().to_string(), record: ProductRecord::from_draft(draft, now.clone(), now) };

        let mut cached = self.cached.write().await;
        let previous = cached.clone();
        cached.insert(0, product.clone());

        if let Err(e) = self.write(&product).await {
            *cached = previous;
            warn!(id = %product.id, error = %e, "product create failed; rolled back");
            return Err(e.into());
        }
        Ok(product)
    }

    /// Replace a product's editable fields, keeping `createdAt` and any
    /// imported extra columns.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such product exists, `Invalid` for bad
    /// drafts, or the store error after rolling back.
    pub async fn update(&self, id: &str, draft: ProductDraft) -> Result<Product, ProductError> {
        draft.validate()?;
        let path = product_path(id);
        let Some(existing) = docstore::get_typed::<ProductRecord>(self.docs.as_ref(), &path).await? else {
            return Err(ProductError::NotFound(id.to_owned()));
        };

        let mut record = ProductRecord::from_draft(draft, existing.created_at, now_rfc3339());
        record.extra = existing.extra;
        let product = Product { id: id.to_owned(), record };

        let mut cached = self.cached.write().await;
        let previous = cached.clone();
        match cached.iter_mut().find(|p| p.id == id) {
            Some(slot) => *slot = product.clone(),
            None => cached.push(product.clone()),
        }

        if let Err(e) = self.write(&product).await {
            *cached = previous;
            warn!(%id, error = %e, "product update failed; rolled back");
            return Err(e.into());
        }
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns the store error after rolling back the in-memory catalog.
    pub async fn delete(&self, id: &str) -> Result<(), ProductError> {
        let mut cached = self.cached.write().await;
        let previous = cached.clone();
        cached.retain(|p| p.id != id);

        if let Err(e) = self.docs.delete(&product_path(id)).await {
            *cached = previous;
            warn!(%id, error = %e, "product delete failed; rolled back");
            return Err(e.into());
        }
        Ok(())
    }

    async fn write(&self, product: &Product) -> Result<(), DocError> {
        let path = product_path(&product.id);
        let value = docstore::encode(&path, &product.record)?;
        self.docs.set(&path, value).await
    }
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
