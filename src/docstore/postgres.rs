//! Postgres document store.
//!
//! DESIGN
//! ======
//! Documents live in one JSONB table keyed by `(collection, id)`. Each write
//! runs in a transaction that also issues `pg_notify` with the document path,
//! so the notification is delivered only if the write commits. A background
//! listener turns notifications into `DocChange` events by re-reading the
//! document, which means pushes from other server processes reach local
//! subscribers the same way local writes do.
//!
//! ERROR HANDLING
//! ==============
//! The listener never exits on a transient error: it logs, backs off briefly
//! and keeps receiving. A missed notification only delays convergence until
//! the next write to the same document.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{CHANGE_CAPACITY, DocChange, DocError, DocPath, DocumentStore, Reread, Subscription};

/// Notification channel carrying `collection/id` payloads.
const NOTIFY_CHANNEL: &str = "document_changed";
const LISTENER_RETRY_MS: u64 = 500;

pub struct PgDocumentStore {
    pool: PgPool,
    changes: broadcast::Sender<DocChange>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl PgDocumentStore {
    /// Start listening for change notifications and return the store.
    ///
    /// # Errors
    ///
    /// Returns a database error if the listener connection cannot be opened.
    pub async fn connect(pool: PgPool) -> Result<Self, DocError> {
        let mut listener = PgListener::connect_with(&pool).await?;
        listener.listen(NOTIFY_CHANNEL).await?;

        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        let handle = tokio::spawn(relay_notifications(pool.clone(), listener, changes.clone()));
        info!(channel = NOTIFY_CHANNEL, "document change listener started");

        Ok(Self { pool, changes, listener: Mutex::new(Some(handle)) })
    }
}

#[async_trait::async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, path: &DocPath) -> Result<Option<serde_json::Value>, DocError> {
        Ok(fetch_document(&self.pool, path).await?)
    }

    async fn set(&self, path: &DocPath, value: serde_json::Value) -> Result<(), DocError> {
        let mut tx = self.pool.begin().await?;
        upsert_document(&mut tx, path, &value).await?;
        notify(&mut tx, path).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn set_batch(&self, writes: Vec<(DocPath, serde_json::Value)>) -> Result<(), DocError> {
        if writes.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for (path, value) in &writes {
            upsert_document(&mut tx, path, value).await?;
            notify(&mut tx, path).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> Result<(), DocError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(path.collection())
            .bind(path.id())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() > 0 {
            notify(&mut tx, path).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, serde_json::Value)>, DocError> {
        let rows = sqlx::query_as::<_, (String, serde_json::Value)>(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY id ASC",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    fn subscribe(&self, path: &DocPath) -> Subscription {
        Subscription::new(path.clone(), self.changes.subscribe(), Arc::new(self.pool.clone()))
    }

    async fn close(&self) {
        if let Some(handle) = self.listener.lock().await.take() {
            handle.abort();
        }
        self.pool.close().await;
        info!("document store closed");
    }
}

#[async_trait::async_trait]
impl Reread for PgPool {
    async fn reread(&self, path: &DocPath) -> Result<Option<serde_json::Value>, DocError> {
        Ok(fetch_document(self, path).await?)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

async fn fetch_document(pool: &PgPool, path: &DocPath) -> Result<Option<serde_json::Value>, sqlx::Error> {
    sqlx::query_scalar::<_, serde_json::Value>("SELECT data FROM documents WHERE collection = $1 AND id = $2")
        .bind(path.collection())
        .bind(path.id())
        .fetch_optional(pool)
        .await
}

async fn upsert_document(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    path: &DocPath,
    value: &serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO documents (collection, id, data, updated_at) VALUES ($1, $2, $3, now()) \
         ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data, updated_at = now()",
    )
    .bind(path.collection())
    .bind(path.id())
    .bind(value)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn notify(tx: &mut sqlx::Transaction<'_, sqlx::Postgres>, path: &DocPath) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_notify($1, $2)")
        .bind(NOTIFY_CHANNEL)
        .bind(path.to_string())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn relay_notifications(pool: PgPool, mut listener: PgListener, changes: broadcast::Sender<DocChange>) {
    loop {
        let notification = match listener.recv().await {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "document listener receive failed; retrying");
                tokio::time::sleep(Duration::from_millis(LISTENER_RETRY_MS)).await;
                continue;
            }
        };

        let Some(path) = DocPath::parse(notification.payload()) else {
            warn!(payload = notification.payload(), "ignoring malformed document notification");
            continue;
        };

        match fetch_document(&pool, &path).await {
            Ok(value) => {
                let _ = changes.send(DocChange { path, value });
            }
            Err(e) => warn!(error = %e, %path, "failed to load changed document"),
        }
    }
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "postgres_test.rs"]
mod tests;
