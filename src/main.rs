mod config;
mod db;
mod docstore;
mod frame;
mod layout;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use docstore::DocumentStore;
use docstore::memory::MemoryStore;
use docstore::postgres::PgDocumentStore;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    let docs: Arc<dyn DocumentStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections)
                .await
                .expect("database init failed");
            Arc::new(PgDocumentStore::connect(pool).await.expect("document store init failed"))
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory document store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = state::AppState::new(Arc::clone(&docs), &config);
    if state.admins.is_empty() {
        warn!("ADMIN_EMAILS is empty; admin routes will reject every request");
    }

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    info!(%port, "storefront listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    docs.close().await;
    info!("storefront stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
