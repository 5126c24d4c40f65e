//! Public storefront pages: the composed home page, the age gate and the
//! static content pages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use leptos::prelude::*;
use time::Duration;
use tracing::warn;

use super::doc_error_to_status;
use crate::layout::LayoutStore;
use crate::layout::preview::page_body;
use crate::services::analytics;
use crate::services::auth::{AGE_VERIFIED_COOKIE, AGE_VERIFIED_DAYS};
use crate::services::static_pages::{self, PageError};
use crate::services::store_settings::{self, StoreSettings};
use crate::state::AppState;

const FALLBACK_BACKGROUND: &str = "#F3F4F6";

fn is_age_verified(jar: &CookieJar) -> bool {
    jar.get(AGE_VERIFIED_COOKIE).is_some_and(|c| c.value() == "true")
}

fn html_document(settings: &StoreSettings, title: &str, body: AnyView) -> String {
    let background = settings.background_color().unwrap_or(FALLBACK_BACKGROUND).to_owned();
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>{title.to_owned()}</title>
            </head>
            <body style=format!("background-color: {background}; margin: 0")>{body}</body>
        </html>
    }
    .to_html()
}

fn age_gate(settings: &StoreSettings) -> String {
    let body = view! {
        <div class="min-h-screen flex items-center justify-center" data-age-gate="">
            <form method="post" action="/age-verification" class="bg-white rounded-lg shadow-lg p-8 text-center">
                <h1 class="text-2xl font-bold mb-4">{settings.store.name.clone()}</h1>
                <p class="mb-6">"You must be 21 or older to enter this site."</p>
                <button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded-md">"I am 21 or older"</button>
            </form>
        </div>
    };
    html_document(settings, &settings.store.name, body.into_any())
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /`: storefront home page composed from the layout document.
pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    analytics::record_visit(state.docs.as_ref(), "/").await;
    let settings = store_settings::load_or_default(state.docs.as_ref()).await;
    if settings.features.age_verification && !is_age_verified(&jar) {
        return Html(age_gate(&settings));
    }

    let mut store = LayoutStore::new(state.docs.clone());
    store.fetch_layout().await;
    let body = store.layout().map_or_else(|| ().into_any(), page_body);
    Html(html_document(&settings, &settings.store.name, body))
}

/// `POST /age-verification`: record a passed age gate and return home.
pub async fn verify_age(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = Cookie::build((AGE_VERIFIED_COOKIE, "true"))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.cookie_secure)
        .max_age(Duration::days(AGE_VERIFIED_DAYS));
    (CookieJar::new().add(cookie), Redirect::to("/"))
}

/// `DELETE /age-verification`: forget the visitor's age verification.
pub async fn reset_age(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = Cookie::build((AGE_VERIFIED_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.cookie_secure)
        .max_age(Duration::ZERO);
    (CookieJar::new().add(cookie), StatusCode::NO_CONTENT)
}

/// `GET /pages/{page_id}`: static content page.
pub async fn static_page(State(state): State<AppState>, Path(page_id): Path<String>) -> Response {
    let settings = store_settings::load_or_default(state.docs.as_ref()).await;
    match static_pages::load(state.docs.as_ref(), &page_id).await {
        Ok(page) => {
            let body = view! {
                <main class="max-w-3xl mx-auto p-8">
                    <article class="prose" data-static-page=page_id.clone()>{page.content}</article>
                </main>
            };
            Html(html_document(&settings, &settings.store.name, body.into_any())).into_response()
        }
        Err(PageError::InvalidId(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(PageError::Store(e)) => {
            warn!(%page_id, error = %e, "static page unavailable");
            doc_error_to_status(&e).into_response()
        }
    }
}

#[cfg(test)]
#[path = "storefront_test.rs"]
mod tests;
