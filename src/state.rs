//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the document store handle every service reads through, the product
//! catalog and the admin policy. There is no shared layout state: each
//! editor websocket owns its own `LayoutStore`.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::docstore::DocumentStore;
use crate::services::auth::AdminPolicy;
use crate::services::products::ProductCatalog;

/// Shared application state. Clone is required by Axum; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub docs: Arc<dyn DocumentStore>,
    pub products: Arc<ProductCatalog>,
    pub admins: Arc<AdminPolicy>,
    /// Mark cookies `Secure`; set when served over HTTPS.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(docs: Arc<dyn DocumentStore>, config: &AppConfig) -> Self {
        Self {
            products: Arc::new(ProductCatalog::new(Arc::clone(&docs))),
            docs,
            admins: Arc::new(AdminPolicy::new(&config.admin_emails)),
            cookie_secure: config.cookie_secure,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
