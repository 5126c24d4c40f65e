//! Photo bank API.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use tracing::{info, warn};

use super::auth::AdminUser;
use super::doc_error_to_status;
use super::products::CategoryQuery;
use crate::services::photo_bank::{self, NewPhoto, Photo, PhotoError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

fn photo_error_to_status(err: &PhotoError) -> StatusCode {
    match err {
        PhotoError::NotFound(_) => StatusCode::NOT_FOUND,
        PhotoError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PhotoError::Store(e) => doc_error_to_status(e),
    }
}

/// `GET /api/photos?category=`
pub async fn list_photos(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Photo>>, StatusCode> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    photo_bank::list(state.docs.as_ref(), category).await.map(Json).map_err(|e| {
        warn!(error = %e, "photo listing failed");
        photo_error_to_status(&e)
    })
}

/// `POST /api/photos`
pub async fn save_photo(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(photo): Json<NewPhoto>,
) -> Result<(StatusCode, Json<Photo>), StatusCode> {
    let saved = photo_bank::save(state.docs.as_ref(), photo).await.map_err(|e| photo_error_to_status(&e))?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// `DELETE /api/photos/{id}`: returns the removed metadata.
pub async fn delete_photo(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Photo>, StatusCode> {
    photo_bank::delete(state.docs.as_ref(), &id).await.map(Json).map_err(|e| photo_error_to_status(&e))
}

/// `POST /api/photos/{id}/touch`: always 204; missing photos are ignored.
pub async fn touch_photo(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<String>) -> StatusCode {
    photo_bank::touch(state.docs.as_ref(), &id).await;
    StatusCode::NO_CONTENT
}

/// `DELETE /api/photos`
pub async fn clear_photos(State(state): State<AppState>, admin: AdminUser) -> Result<Json<ClearResponse>, StatusCode> {
    let cleared = photo_bank::clear(state.docs.as_ref()).await.map_err(|e| photo_error_to_status(&e))?;
    info!(email = %admin.email, cleared, "photo bank cleared");
    Ok(Json(ClearResponse { cleared }))
}

#[cfg(test)]
#[path = "photos_test.rs"]
mod tests;
