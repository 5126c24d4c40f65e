//! Request identity extractors.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::StatusCode;
use axum::http::request::Parts;
use tracing::warn;

use crate::services::auth::AUTH_EMAIL_HEADER;
use crate::state::AppState;

/// Email forwarded by the identity proxy, if any.
pub(crate) fn forwarded_email(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTH_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

// =============================================================================
// ADMIN EXTRACTOR
// =============================================================================

/// Authenticated administrator. Use as a handler parameter to require the
/// admin role: missing identity is 401, a non-admin identity is 403.
pub struct AdminUser {
    pub email: String,
}

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(email) = forwarded_email(parts) else {
            return Err(StatusCode::UNAUTHORIZED);
        };
        let app_state = AppState::from_ref(state);
        if !app_state.admins.is_admin(&email) {
            warn!(%email, path = %parts.uri.path(), "admin route denied");
            return Err(StatusCode::FORBIDDEN);
        }
        Ok(Self { email })
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
