//! Analytics API: the admin dashboard summary and public product-view beacons.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::warn;

use super::auth::AdminUser;
use super::doc_error_to_status;
use crate::services::analytics::{self, AnalyticsError, AnalyticsRange, AnalyticsSummary, NewProductView};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
}

fn analytics_error_to_status(err: &AnalyticsError) -> StatusCode {
    match err {
        AnalyticsError::InvalidRange(_) => StatusCode::BAD_REQUEST,
        AnalyticsError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        AnalyticsError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AnalyticsError::Store(e) => doc_error_to_status(e),
    }
}

/// `GET /api/analytics?range=week|month|year`
pub async fn get_summary(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<AnalyticsSummary>, StatusCode> {
    let range = AnalyticsRange::parse(query.range.as_deref()).map_err(|e| analytics_error_to_status(&e))?;
    analytics::summary(state.docs.as_ref(), range, OffsetDateTime::now_utc()).await.map(Json).map_err(|e| {
        warn!(error = %e, "analytics summary failed");
        analytics_error_to_status(&e)
    })
}

/// `POST /api/analytics/product-views`: public, fired by product pages.
pub async fn record_product_view(State(state): State<AppState>, Json(view): Json<NewProductView>) -> StatusCode {
    match analytics::record_product_view(state.docs.as_ref(), view).await {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(e) => analytics_error_to_status(&e),
    }
}

#[cfg(test)]
#[path = "analytics_test.rs"]
mod tests;
