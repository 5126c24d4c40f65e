//! Layout editor: document model, component registry, renderers, preview,
//! settings panel and the per-session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Data flows one way: a panel edit goes through `LayoutStore`, is persisted
//! as a whole document, comes back through the document subscription and is
//! rendered by `preview` through the `registry`.

pub mod document;
pub mod panel;
pub mod preview;
pub mod registry;
pub mod render;
pub mod store;

pub use document::{ComponentDescriptor, LayoutDocument, Settings, Theme};
pub use preview::{PreviewClick, PreviewMode};
pub use store::LayoutStore;
