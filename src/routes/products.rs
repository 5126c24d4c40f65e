//! Product catalog and bulk import API.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::{info, warn};

use super::auth::AdminUser;
use super::doc_error_to_status;
use crate::services::import::{self, ImportError, ImportPreview, ImportReport};
use crate::services::products::{Product, ProductDraft, ProductError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

pub(crate) fn product_error_to_status(err: &ProductError) -> StatusCode {
    match err {
        ProductError::NotFound(_) => StatusCode::NOT_FOUND,
        ProductError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProductError::Store(e) => doc_error_to_status(e),
    }
}

fn import_error_to_status(err: &ImportError) -> StatusCode {
    match err {
        ImportError::Empty | ImportError::InvalidJson(_) => StatusCode::BAD_REQUEST,
        ImportError::Store(e) => doc_error_to_status(e),
    }
}

/// `GET /api/products?category=`
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Product>>, StatusCode> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    state.products.list(category).await.map(Json).map_err(|e| {
        warn!(error = %e, "product listing failed");
        product_error_to_status(&e)
    })
}

/// `POST /api/products`
pub async fn create_product(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), StatusCode> {
    let product = state.products.create(draft).await.map_err(|e| product_error_to_status(&e))?;
    info!(email = %admin.email, id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}`
pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, StatusCode> {
    state.products.update(&id, draft).await.map(Json).map_err(|e| product_error_to_status(&e))
}

/// `DELETE /api/products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    state.products.delete(&id).await.map_err(|e| product_error_to_status(&e))?;
    info!(email = %admin.email, %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/products/import/preview`: body is a JSON array or JSONL.
pub async fn import_preview(_admin: AdminUser, body: String) -> Result<Json<ImportPreview>, StatusCode> {
    let parsed = import::parse_rows(&body).map_err(|e| import_error_to_status(&e))?;
    import::preview(&parsed).map(Json).map_err(|e| import_error_to_status(&e))
}

/// `POST /api/products/import`: body is a JSON array or JSONL.
pub async fn import_products(
    State(state): State<AppState>,
    admin: AdminUser,
    body: String,
) -> Result<Json<ImportReport>, StatusCode> {
    let parsed = import::parse_rows(&body).map_err(|e| import_error_to_status(&e))?;
    let report = import::import(state.docs.as_ref(), parsed).await.map_err(|e| {
        warn!(email = %admin.email, error = %e, "product import failed");
        import_error_to_status(&e)
    })?;
    Ok(Json(report))
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
