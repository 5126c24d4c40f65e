//! Read-only layout endpoints: the current document and a rendered preview.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use serde::Deserialize;

use crate::layout::preview::render_preview;
use crate::layout::store::StoreSnapshot;
use crate::layout::{LayoutStore, PreviewMode};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    pub mode: Option<String>,
    pub selected: Option<String>,
}

/// `GET /api/layout`: fetch the layout, creating the starter on first use.
pub async fn get_layout(State(state): State<AppState>) -> Json<StoreSnapshot> {
    let mut store = LayoutStore::new(state.docs.clone());
    store.fetch_layout().await;
    Json(store.snapshot())
}

/// `GET /api/layout/preview?mode=&selected=`: editor canvas markup.
pub async fn preview(State(state): State<AppState>, Query(query): Query<PreviewQuery>) -> Response {
    let mode = match query.mode.as_deref() {
        None => PreviewMode::default(),
        Some(raw) => match PreviewMode::parse(raw) {
            Some(mode) => mode,
            None => return (StatusCode::BAD_REQUEST, "mode must be desktop, tablet or mobile").into_response(),
        },
    };

    let mut store = LayoutStore::new(state.docs.clone());
    store.fetch_layout().await;
    let Some(layout) = store.layout() else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    Html(render_preview(layout, mode, query.selected.as_deref())).into_response()
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
