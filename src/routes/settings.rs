//! Store settings API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use tracing::{info, warn};

use super::auth::AdminUser;
use super::doc_error_to_status;
use crate::services::store_settings::{self, StoreSettings};
use crate::state::AppState;

/// `GET /api/settings/store`
pub async fn get_store_settings(State(state): State<AppState>) -> Result<Json<StoreSettings>, StatusCode> {
    store_settings::load(state.docs.as_ref()).await.map(Json).map_err(|e| {
        warn!(error = %e, "store settings unavailable");
        doc_error_to_status(&e)
    })
}

/// `PUT /api/settings/store`: replace the whole settings document.
pub async fn put_store_settings(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(settings): Json<StoreSettings>,
) -> Result<Json<StoreSettings>, StatusCode> {
    store_settings::save(state.docs.as_ref(), &settings).await.map_err(|e| {
        warn!(email = %admin.email, error = %e, "store settings write failed");
        doc_error_to_status(&e)
    })?;
    info!(email = %admin.email, "store settings updated");
    Ok(Json(settings))
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
