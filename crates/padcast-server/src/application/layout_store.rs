//! LayoutStore: the named layouts every session and the HTTP API share.
//!
//! The store keeps all layouts in memory behind a `tokio::sync::RwLock`
//! (many readers, one writer) and writes the whole map back to a
//! [`LayoutDocument`] after every change.
//!
//! # Start-up repair
//!
//! [`LayoutStore::load`] never fails.  A missing, empty or unreadable
//! document, or one holding no layouts at all (`{}`), is replaced by the
//! built-in layouts, and a document that lacks
//! the protected `"Arrows"` layout gets it back.  In both cases the repaired
//! map is written out straight away.
//!
//! # Persistence failures
//!
//! A failed write is logged and the in-memory change is kept, so the running
//! server stays consistent with what clients were told.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use padcast_core::domain::layout::{arrow_layout, default_layouts, PROTECTED_LAYOUT};
use padcast_core::{Layout, LayoutMap};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Error type for layout store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The layout is built in and may not be deleted.
    #[error("the default '{0}' layout cannot be deleted")]
    Protected(String),

    #[error("layout {0:?} not found")]
    NotFound(String),

    /// A file system I/O error occurred.
    #[error("I/O error accessing layouts at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The layouts could not be encoded as JSON.
    #[error("failed to encode layouts: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where the layout map is persisted.
///
/// `load` returns `Ok(None)` when there is nothing usable to load (no
/// document yet, an empty one, or one that does not parse); the store then
/// falls back to its built-in layouts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LayoutDocument: Send + Sync {
    async fn load(&self) -> Result<Option<LayoutMap>, StoreError>;

    async fn save(&self, layouts: &LayoutMap) -> Result<(), StoreError>;
}

/// Shared, persisted map of layout name → [`Layout`].
pub struct LayoutStore {
    layouts: RwLock<LayoutMap>,
    document: Arc<dyn LayoutDocument>,
}

impl LayoutStore {
    /// Loads the store from `document`, repairing it if needed.
    pub async fn load(document: Arc<dyn LayoutDocument>) -> Self {
        let (layouts, repaired) = match document.load().await {
            Ok(Some(layouts)) if layouts.is_empty() => {
                info!("saved layouts are empty, starting from built-in defaults");
                (default_layouts(), true)
            }
            Ok(Some(mut layouts)) => {
                if layouts.contains_key(PROTECTED_LAYOUT) {
                    (layouts, false)
                } else {
                    info!("restoring missing '{PROTECTED_LAYOUT}' layout");
                    layouts.insert(PROTECTED_LAYOUT.to_string(), arrow_layout());
                    (layouts, true)
                }
            }
            Ok(None) => {
                info!("no saved layouts, starting from built-in defaults");
                (default_layouts(), true)
            }
            Err(e) => {
                warn!("failed to read saved layouts, starting from built-in defaults: {e}");
                (default_layouts(), true)
            }
        };

        if repaired {
            if let Err(e) = document.save(&layouts).await {
                error!("failed to persist repaired layouts: {e}");
            }
        }
        info!(count = layouts.len(), "layouts loaded");

        Self {
            layouts: RwLock::new(layouts),
            document,
        }
    }

    /// Returns every layout.
    pub async fn get_all(&self) -> LayoutMap {
        self.layouts.read().await.clone()
    }

    /// Returns a copy of the layout called `name`.
    pub async fn get(&self, name: &str) -> Option<Layout> {
        self.layouts.read().await.get(name).cloned()
    }

    /// The names of every layout, sorted.
    pub async fn names(&self) -> Vec<String> {
        self.layouts.read().await.keys().cloned().collect()
    }

    /// Creates or replaces the layout called `name`.
    pub async fn put(&self, name: &str, layout: Layout) {
        let mut layouts = self.layouts.write().await;
        layouts.insert(name.to_string(), layout);
        debug!(layout = name, "layout saved");
        self.persist(&layouts).await;
    }

    /// Removes the layout called `name`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Protected`] for `"Arrows"`.
    /// - [`StoreError::NotFound`] if there is no such layout.
    pub async fn delete(&self, name: &str) -> Result<(), StoreError> {
        if name == PROTECTED_LAYOUT {
            return Err(StoreError::Protected(name.to_string()));
        }
        let mut layouts = self.layouts.write().await;
        if layouts.remove(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        debug!(layout = name, "layout deleted");
        self.persist(&layouts).await;
        Ok(())
    }

    /// Writes the map while the caller still holds the write lock, so
    /// concurrent writes reach the document in the order they were applied.
    async fn persist(&self, layouts: &LayoutMap) {
        if let Err(e) = self.document.save(layouts).await {
            error!("failed to persist layouts, keeping change in memory: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
