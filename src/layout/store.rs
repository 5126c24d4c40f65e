//! Layout store: one editor session's view of the layout document.
//!
//! DESIGN
//! ======
//! Mutations are optimistic. Each one changes the in-memory layout first,
//! then spawns a whole-document write and returns its handle. A failed write
//! is logged and never rolled back; the next successful write or remote push
//! reconciles. There is no version check: whichever write lands last wins,
//! and a remote push overwrites local state unconditionally.
//!
//! Selection is kept as a component id and resolved against the current
//! layout on every read, so a push that removes the selected component also
//! clears the effective selection.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::document::{ComponentDescriptor, LayoutDocument, Settings};
use super::preview::{PreviewClick, PreviewMode};
use crate::docstore::{self, DocPath, DocumentStore, Subscription};

/// Error surfaced to the editor when the layout cannot be read.
pub const LOAD_ERROR: &str = "Failed to load layout";

pub struct LayoutStore {
    docs: Arc<dyn DocumentStore>,
    layout: Option<LayoutDocument>,
    selected: Option<String>,
    preview_mode: PreviewMode,
    loading: bool,
    error: Option<String>,
}

/// Serializable view of the store, sent to editor clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub layout: Option<LayoutDocument>,
    pub selected_component: Option<String>,
    pub preview_mode: PreviewMode,
    pub loading: bool,
    pub error: Option<String>,
}

impl LayoutStore {
    #[must_use]
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs, layout: None, selected: None, preview_mode: PreviewMode::default(), loading: true, error: None }
    }

    #[must_use]
    pub fn layout(&self) -> Option<&LayoutDocument> {
        self.layout.as_ref()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn preview_mode(&self) -> PreviewMode {
        self.preview_mode
    }

    /// The selected component, if it still exists in the current layout.
    #[must_use]
    pub fn selected_component(&self) -> Option<&ComponentDescriptor> {
        let id = self.selected.as_deref()?;
        self.layout.as_ref()?.component(id)
    }

    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            layout: self.layout.clone(),
            selected_component: self.selected_component().map(|c| c.id.clone()),
            preview_mode: self.preview_mode,
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    /// Watch the persisted layout for writes from any session.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        self.docs.subscribe(&LayoutDocument::path())
    }

    // =========================================================================
    // LOADING
    // =========================================================================

    /// Load the persisted layout.
    ///
    /// A missing document is replaced by the starter layout, written once.
    /// A read or decode failure adopts the starter layout without writing it
    /// and records `LOAD_ERROR`.
    pub async fn fetch_layout(&mut self) {
        let path = LayoutDocument::path();
        self.loading = true;

        let layout = match docstore::get_typed::<LayoutDocument>(self.docs.as_ref(), &path).await {
            Ok(Some(layout)) => {
                self.error = None;
                layout
            }
            Ok(None) => {
                let starter = LayoutDocument::starter();
                match self.write_now(&path, &starter).await {
                    Ok(()) => {
                        debug!(%path, "created starter layout");
                        self.error = None;
                    }
                    Err(e) => {
                        warn!(%path, error = %e, "failed to create starter layout");
                        self.error = Some(LOAD_ERROR.into());
                    }
                }
                starter
            }
            Err(e) => {
                warn!(%path, error = %e, "failed to load layout");
                self.error = Some(LOAD_ERROR.into());
                LayoutDocument::starter()
            }
        };

        self.layout = Some(layout);
        self.loading = false;
    }

    async fn write_now(&self, path: &DocPath, layout: &LayoutDocument) -> Result<(), docstore::DocError> {
        let value = docstore::encode(path, layout)?;
        self.docs.set(path, value).await
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    pub fn set_selected_component(&mut self, component: Option<&ComponentDescriptor>) {
        self.selected = component.map(|c| c.id.clone());
    }

    pub fn set_preview_mode(&mut self, mode: PreviewMode) {
        self.preview_mode = mode;
    }

    /// Select the clicked component, or clear the selection on a canvas click.
    pub fn handle_preview_click(&mut self, click: PreviewClick) {
        self.selected = match click {
            PreviewClick::Component(id) => {
                let known = self.layout.as_ref().is_some_and(|layout| layout.component(&id).is_some());
                known.then_some(id)
            }
            PreviewClick::Canvas => None,
        };
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Replace one component's settings.
    ///
    /// Returns `None` without writing if no layout is loaded or no component
    /// has this id.
    pub fn update_component(&mut self, id: &str, settings: Settings) -> Option<JoinHandle<()>> {
        let component = self.layout.as_mut()?.component_mut(id);
        let Some(component) = component else {
            debug!(%id, "update for unknown component ignored");
            return None;
        };
        component.settings = settings;
        self.persist()
    }

    /// Replace the whole component sequence.
    ///
    /// A sequence with duplicate ids is rejected and nothing is written.
    pub fn update_component_order(&mut self, components: Vec<ComponentDescriptor>) -> Option<JoinHandle<()>> {
        let layout = self.layout.as_mut()?;
        let mut seen = HashSet::new();
        if let Some(dup) = components.iter().find(|c| !seen.insert(c.id.as_str())) {
            warn!(id = %dup.id, "component order rejected; duplicate id");
            return None;
        }
        layout.components = components;
        self.persist()
    }

    pub fn toggle_component_visibility(&mut self, id: &str) -> Option<JoinHandle<()>> {
        let component = self.layout.as_mut()?.component_mut(id);
        let Some(component) = component else {
            debug!(%id, "toggle for unknown component ignored");
            return None;
        };
        component.visible = !component.visible;
        self.persist()
    }

    /// Set one theme color.
    pub fn update_theme(&mut self, key: &str, value: &str) -> Option<JoinHandle<()>> {
        let layout = self.layout.as_mut()?;
        layout.theme.insert(key.to_owned(), value.to_owned());
        self.persist()
    }

    /// Adopt a layout pushed by the document store.
    pub fn apply_remote(&mut self, layout: LayoutDocument) {
        self.layout = Some(layout);
        self.error = None;
        self.loading = false;
    }

    /// Adopt a raw subscription value. Returns true if the local layout changed.
    ///
    /// Deletions and undecodable documents keep the current layout.
    pub fn apply_remote_value(&mut self, value: Option<serde_json::Value>) -> bool {
        let path = LayoutDocument::path();
        let Some(value) = value else {
            warn!(%path, "layout document deleted remotely; keeping local copy");
            return false;
        };
        match docstore::decode::<LayoutDocument>(&path, value) {
            Ok(layout) if self.layout.as_ref() == Some(&layout) => false,
            Ok(layout) => {
                self.apply_remote(layout);
                true
            }
            Err(e) => {
                warn!(%path, error = %e, "ignoring undecodable layout push");
                false
            }
        }
    }

    fn persist(&self) -> Option<JoinHandle<()>> {
        let layout = self.layout.as_ref()?;
        let path = LayoutDocument::path();
        let value = match docstore::encode(&path, layout) {
            Ok(value) => value,
            Err(e) => {
                warn!(%path, error = %e, "failed to encode layout");
                return None;
            }
        };

        let docs = Arc::clone(&self.docs);
        Some(tokio::spawn(async move {
            if let Err(e) = docs.set(&path, value).await {
                warn!(%path, error = %e, "layout write failed");
            }
        }))
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
