//! In-memory document store.
//!
//! Used when no `DATABASE_URL` is configured and by every unit test. Changes
//! fan out through a broadcast channel exactly like the Postgres adapter, so
//! subscribers cannot tell the two apart.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::{RwLock, broadcast};

use super::{CHANGE_CAPACITY, DocChange, DocError, DocPath, DocumentStore, Reread, Subscription};

type Documents = RwLock<HashMap<DocPath, serde_json::Value>>;

pub struct MemoryStore {
    docs: Arc<Documents>,
    changes: broadcast::Sender<DocChange>,
    /// Successful document writes (set, batch entries, deletes).
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            docs: Arc::new(RwLock::new(HashMap::new())),
            changes,
            writes: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Number of documents written since construction.
    #[cfg(test)]
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> Result<(), DocError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DocError::Unavailable("reads disabled".into()));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<(), DocError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DocError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }

    fn publish(&self, path: DocPath, value: Option<serde_json::Value>) {
        // No receivers is the normal idle case.
        let _ = self.changes.send(DocChange { path, value });
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Make every subsequent read fail with `Unavailable`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with `Unavailable`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<serde_json::Value>, DocError> {
        self.check_reads()?;
        Ok(self.docs.read().await.get(path).cloned())
    }

    async fn set(&self, path: &DocPath, value: serde_json::Value) -> Result<(), DocError> {
        self.check_writes()?;
        self.docs.write().await.insert(path.clone(), value.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.publish(path.clone(), Some(value));
        Ok(())
    }

    async fn set_batch(&self, writes: Vec<(DocPath, serde_json::Value)>) -> Result<(), DocError> {
        self.check_writes()?;
        {
            let mut docs = self.docs.write().await;
            for (path, value) in &writes {
                docs.insert(path.clone(), value.clone());
            }
        }
        self.writes.fetch_add(writes.len(), Ordering::SeqCst);
        for (path, value) in writes {
            self.publish(path, Some(value));
        }
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> Result<(), DocError> {
        self.check_writes()?;
        if self.docs.write().await.remove(path).is_some() {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.publish(path.clone(), None);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, serde_json::Value)>, DocError> {
        self.check_reads()?;
        let docs = self.docs.read().await;
        let mut out = docs
            .iter()
            .filter(|(path, _)| path.collection() == collection)
            .map(|(path, value)| (path.id().to_owned(), value.clone()))
            .collect::<Vec<_>>();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    fn subscribe(&self, path: &DocPath) -> Subscription {
        Subscription::new(path.clone(), self.changes.subscribe(), self.docs.clone())
    }
}

#[async_trait::async_trait]
impl Reread for Documents {
    async fn reread(&self, path: &DocPath) -> Result<Option<serde_json::Value>, DocError> {
        Ok(self.read().await.get(path).cloned())
    }
}
