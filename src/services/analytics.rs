//! Storefront analytics over the document store.
//!
//! DESIGN
//! ======
//! Visits and product views are append-only documents in their own
//! collections, each stamped with an RFC 3339 `timestamp`. The admin summary
//! is computed on read: visits in range grouped by UTC day, the most recent
//! product views aggregated per product, and the category mix of the current
//! catalog. Nothing is pre-aggregated, so a summary always reflects the
//! collections as they are.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use super::products::{PRODUCTS_COLLECTION, ProductRecord};
use super::{now_rfc3339, parse_rfc3339};
use crate::docstore::{self, DocError, DocPath, DocumentStore};
use crate::frame::ErrorCode;

pub const VISITS_COLLECTION: &str = "analytics_visits";
pub const PRODUCT_VIEWS_COLLECTION: &str = "product_views";

/// Number of most recent views the popular-products chart is built from.
pub const POPULAR_VIEW_SAMPLE: usize = 10;

/// Bucket for products saved without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("unknown analytics range: {0}")]
    InvalidRange(String),
    #[error("product not found: {0}")]
    ProductNotFound(String),
    #[error("invalid product view: {0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Store(#[from] DocError),
}

impl ErrorCode for AnalyticsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange(_) => "E_INVALID_RANGE",
            Self::ProductNotFound(_) => "E_PRODUCT_NOT_FOUND",
            Self::Invalid(_) => "E_VIEW_INVALID",
            Self::Store(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.retryable())
    }
}

// =============================================================================
// RANGE
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsRange {
    #[default]
    Week,
    Month,
    Year,
}

impl AnalyticsRange {
    /// Parse a query value. Absent or empty means the default week.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` for anything other than week, month or year.
    pub fn parse(raw: Option<&str>) -> Result<Self, AnalyticsError> {
        match raw.map(str::trim) {
            None | Some("" | "week") => Ok(Self::Week),
            Some("month") => Ok(Self::Month),
            Some("year") => Ok(Self::Year),
            Some(other) => Err(AnalyticsError::InvalidRange(other.to_owned())),
        }
    }

    /// First instant included in the range ending at `now`.
    #[must_use]
    pub fn start(self, now: OffsetDateTime) -> OffsetDateTime {
        match self {
            Self::Week => now - Duration::days(7),
            Self::Month => months_before(now, 1),
            Self::Year => months_before(now, 12),
        }
    }
}

/// Same wall-clock time `months` calendar months earlier. The day is clamped
/// to the length of the target month (31 March minus one month is 29 or 28
/// February).
fn months_before(at: OffsetDateTime, months: i32) -> OffsetDateTime {
    let index = at.year() * 12 + i32::from(u8::from(at.month())) - 1 - months;
    let year = index.div_euclid(12);
    let month = u8::try_from(index.rem_euclid(12) + 1)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .unwrap_or(Month::January);
    (28..=at.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
        .map_or(at, |date| at.replace_date(date))
}

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub timestamp: String,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub product_id: String,
    pub product_name: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductView {
    pub product_id: String,
}

/// Record one page visit. Failures are logged; a lost visit never fails the page.
pub async fn record_visit(docs: &dyn DocumentStore, path: &str) {
    let doc_path = DocPath::new(VISITS_COLLECTION, Uuid::new_v4().to_string());
    let visit = Visit { timestamp: now_rfc3339(), path: path.to_owned() };
    let result = match docstore::encode(&doc_path, &visit) {
        Ok(value) => docs.set(&doc_path, value).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        warn!(%path, error = %e, "failed to record visit");
    }
}

/// Record one product view, taking the name from the product document.
///
/// # Errors
///
/// Returns `Invalid` for a blank id, `ProductNotFound` if no such product
/// exists, or the store error.
pub async fn record_product_view(docs: &dyn DocumentStore, view: NewProductView) -> Result<ProductView, AnalyticsError> {
    let product_id = view.product_id.trim();
    if product_id.is_empty() || product_id.contains('/') {
        return Err(AnalyticsError::Invalid("productId is required"));
    }
    let product_path = DocPath::new(PRODUCTS_COLLECTION, product_id);
    let Some(product) = docstore::get_typed::<ProductRecord>(docs, &product_path).await? else {
        return Err(AnalyticsError::ProductNotFound(product_id.to_owned()));
    };

    let record = ProductView { product_id: product_id.to_owned(), product_name: product.name, timestamp: now_rfc3339() };
    let path = DocPath::new(PRODUCT_VIEWS_COLLECTION, Uuid::new_v4().to_string());
    docs.set(&path, docstore::encode(&path, &record)?).await?;
    Ok(record)
}

// =============================================================================
// SUMMARY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayVisits {
    /// UTC calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub visits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularProduct {
    pub product_id: String,
    pub name: String,
    pub views: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    pub total_visits: usize,
    pub total_views: usize,
    pub categories: usize,
    pub total_products: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub range: AnalyticsRange,
    pub visits_by_day: Vec<DayVisits>,
    pub popular_products: Vec<PopularProduct>,
    pub category_distribution: BTreeMap<String, usize>,
    pub stats: AnalyticsStats,
}

/// Compute the dashboard summary for the range ending at `now`.
///
/// Documents with a missing or unparseable timestamp are skipped.
///
/// # Errors
///
/// Returns the store error if any collection cannot be listed.
pub async fn summary(docs: &dyn DocumentStore, range: AnalyticsRange, now: OffsetDateTime) -> Result<AnalyticsSummary, AnalyticsError> {
    let start = range.start(now);

    let mut by_day = BTreeMap::<String, usize>::new();
    for (_, visit) in decoded::<Visit>(docs, VISITS_COLLECTION).await? {
        match parse_rfc3339(&visit.timestamp) {
            Some(at) if at >= start && at <= now => *by_day.entry(at.date().to_string()).or_default() += 1,
            Some(_) => {}
            None => warn!(timestamp = %visit.timestamp, "skipping visit with bad timestamp"),
        }
    }
    let visits_by_day = by_day.into_iter().map(|(date, visits)| DayVisits { date, visits }).collect::<Vec<_>>();

    let mut recent = decoded::<ProductView>(docs, PRODUCT_VIEWS_COLLECTION)
        .await?
        .into_iter()
        .filter_map(|(_, view)| parse_rfc3339(&view.timestamp).filter(|at| *at >= start).map(|at| (at, view)))
        .collect::<Vec<_>>();
    recent.sort_by_key(|(at, _)| Reverse(*at));
    recent.truncate(POPULAR_VIEW_SAMPLE);

    let mut popular_products: Vec<PopularProduct> = Vec::new();
    for (_, view) in recent {
        match popular_products.iter_mut().find(|p| p.product_id == view.product_id) {
            Some(entry) => entry.views += 1,
            None => popular_products.push(PopularProduct { product_id: view.product_id, name: view.product_name, views: 1 }),
        }
    }

    let products = decoded::<ProductRecord>(docs, PRODUCTS_COLLECTION).await?;
    let mut category_distribution = BTreeMap::<String, usize>::new();
    for (_, product) in &products {
        let category = product.category.trim();
        let key = if category.is_empty() { UNCATEGORIZED } else { category };
        *category_distribution.entry(key.to_owned()).or_default() += 1;
    }

    let stats = AnalyticsStats {
        total_visits: visits_by_day.iter().map(|d| d.visits).sum(),
        total_views: popular_products.iter().map(|p| p.views).sum(),
        categories: category_distribution.len(),
        total_products: products.len(),
    };

    Ok(AnalyticsSummary { range, visits_by_day, popular_products, category_distribution, stats })
}

/// List a collection and decode each document, skipping the undecodable.
async fn decoded<T: serde::de::DeserializeOwned>(docs: &dyn DocumentStore, collection: &str) -> Result<Vec<(String, T)>, DocError> {
    let mut out = Vec::new();
    for (id, value) in docs.list(collection).await? {
        match docstore::decode::<T>(&DocPath::new(collection, id.as_str()), value) {
            Ok(record) => out.push((id, record)),
            Err(e) => warn!(%collection, %id, error = %e, "skipping undecodable document"),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "analytics_test.rs"]
mod tests;
