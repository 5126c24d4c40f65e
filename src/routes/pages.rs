//! Static page content API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::warn;

use super::auth::AdminUser;
use super::doc_error_to_status;
use crate::services::static_pages::{self, PageError, StaticPage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageBody {
    pub content: String,
}

fn page_error_to_status(err: &PageError) -> StatusCode {
    match err {
        PageError::InvalidId(_) => StatusCode::NOT_FOUND,
        PageError::Store(e) => doc_error_to_status(e),
    }
}

/// `GET /api/pages/{page_id}`
pub async fn get_page(State(state): State<AppState>, Path(page_id): Path<String>) -> Result<Json<StaticPage>, StatusCode> {
    static_pages::load(state.docs.as_ref(), &page_id).await.map(Json).map_err(|e| {
        warn!(%page_id, error = %e, "static page read failed");
        page_error_to_status(&e)
    })
}

/// `PUT /api/pages/{page_id}`
pub async fn put_page(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(page_id): Path<String>,
    Json(body): Json<PageBody>,
) -> Result<Json<StaticPage>, StatusCode> {
    static_pages::save(state.docs.as_ref(), &page_id, body.content).await.map(Json).map_err(|e| {
        warn!(%page_id, error = %e, "static page write failed");
        page_error_to_status(&e)
    })
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
