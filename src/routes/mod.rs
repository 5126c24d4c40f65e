//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the public storefront pages, the admin JSON APIs and the layout
//! editor websocket under a single Axum router. Admin-only handlers take
//! the `AdminUser` extractor; everything else is public.

pub mod analytics;
pub mod auth;
pub mod layout;
pub mod pages;
pub mod photos;
pub mod products;
pub mod settings;
pub mod storefront;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::docstore::DocError;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(storefront::home))
        .route("/age-verification", post(storefront::verify_age).delete(storefront::reset_age))
        .route("/pages/{page_id}", get(storefront::static_page))
        .route("/api/layout", get(layout::get_layout))
        .route("/api/layout/preview", get(layout::preview))
        .route("/api/layout/ws", get(ws::handle_ws))
        .route("/api/settings/store", get(settings::get_store_settings).put(settings::put_store_settings))
        .route("/api/pages/{page_id}", get(pages::get_page).put(pages::put_page))
        .route("/api/products", get(products::list_products).post(products::create_product))
        .route("/api/products/{id}", put(products::update_product).delete(products::delete_product))
        .route("/api/products/import/preview", post(products::import_preview))
        .route("/api/products/import", post(products::import_products))
        .route("/api/photos", get(photos::list_photos).post(photos::save_photo).delete(photos::clear_photos))
        .route("/api/photos/{id}", delete(photos::delete_photo))
        .route("/api/photos/{id}/touch", post(photos::touch_photo))
        .route("/api/analytics", get(analytics::get_summary))
        .route("/api/analytics/product-views", post(analytics::record_product_view))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub(crate) fn doc_error_to_status(err: &DocError) -> StatusCode {
    match err {
        DocError::Unavailable(_) | DocError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
        DocError::Decode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
