//! Domain services used by websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and document-store access so route
//! handlers can stay focused on protocol translation and auth plumbing.
//! Every service receives the store as `&dyn DocumentStore`.

pub mod analytics;
pub mod auth;
pub mod import;
pub mod photo_bank;
pub mod products;
pub mod static_pages;
pub mod store_settings;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Current UTC time as an RFC 3339 string.
pub(crate) fn now_rfc3339() -> String {
    format_rfc3339(OffsetDateTime::now_utc())
}

pub(crate) fn format_rfc3339(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_default()
}

/// Parse an RFC 3339 timestamp; `None` for anything else.
pub(crate) fn parse_rfc3339(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}
