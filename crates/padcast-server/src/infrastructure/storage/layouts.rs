//! Layout document implementations.
//!
//! [`JsonFileDocument`] keeps every layout in a single pretty-printed JSON
//! file, in the shape the browser editor sends:
//!
//! ```json
//! {
//!   "Arrows": { "items": [ { "i": "up_button", "x": 100, "y": 0, ... } ] },
//!   "default": { "items": [ ... ] }
//! }
//! ```
//!
//! Writes go to a sibling temporary file that is then renamed over the
//! document, so a crash mid-write leaves the previous version intact.
//!
//! # Unreadable layouts
//!
//! Only a file that is not JSON, or not a JSON object, counts as malformed.
//! Inside a valid document each layout is read on its own: one the model
//! cannot read is logged, left out of the store and kept as raw JSON, and
//! every later save writes it back unchanged.  Saving a layout under the
//! same name replaces it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use padcast_core::{Layout, LayoutMap};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::application::layout_store::{LayoutDocument, StoreError};

/// Layouts persisted as one JSON file.
#[derive(Debug)]
pub struct JsonFileDocument {
    path: PathBuf,
    /// Layouts found on load that could not be read, by name.
    unreadable: Mutex<Map<String, Value>>,
}

impl JsonFileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            unreadable: Mutex::new(Map::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the layouts kept as raw JSON, sorted.
    pub fn unreadable_names(&self) -> Vec<String> {
        self.unreadable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "layouts.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Splits a parsed document into readable layouts and raw leftovers.
    fn split_document(&self, document: Map<String, Value>) -> LayoutMap {
        let mut layouts = LayoutMap::new();
        let mut unreadable = Map::new();
        for (name, raw) in document {
            match serde_json::from_value::<Layout>(raw.clone()) {
                Ok(layout) => {
                    layouts.insert(name, layout);
                }
                Err(e) => {
                    warn!(path = %self.path.display(), layout = %name, "layout cannot be read, keeping it untouched: {e}");
                    unreadable.insert(name, raw);
                }
            }
        }
        *self.unreadable.lock().unwrap_or_else(PoisonError::into_inner) = unreadable;
        layouts
    }

    /// The document to write: `layouts` plus every unreadable layout whose
    /// name they do not reuse.
    fn merged_document(&self, layouts: &LayoutMap) -> Result<Value, StoreError> {
        let mut document = match serde_json::to_value(layouts)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let mut unreadable = self.unreadable.lock().unwrap_or_else(PoisonError::into_inner);
        unreadable.retain(|name, _| !layouts.contains_key(name));
        for (name, raw) in unreadable.iter() {
            document.insert(name.clone(), raw.clone());
        }
        Ok(Value::Object(document))
    }
}

#[async_trait]
impl LayoutDocument for JsonFileDocument {
    async fn load(&self) -> Result<Option<LayoutMap>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "layout document does not exist yet");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => Ok(Some(self.split_document(document))),
            Ok(_) => {
                warn!(path = %self.path.display(), "layout document is not a JSON object, ignoring it");
                Ok(None)
            }
            Err(e) => {
                warn!(path = %self.path.display(), "layout document is malformed, ignoring it: {e}");
                Ok(None)
            }
        }
    }

    async fn save(&self, layouts: &LayoutMap) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&self.merged_document(layouts)?)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| self.io_error(dir, e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, content)
            .await
            .map_err(|e| self.io_error(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.io_error(&self.path, e))?;
        debug!(path = %self.path.display(), count = layouts.len(), "layouts written");
        Ok(())
    }
}

/// Layouts held only in memory.
///
/// Used by tests and by `--ephemeral` servers that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    layouts: Mutex<Option<LayoutMap>>,
    saves: Mutex<usize>,
}

impl MemoryDocument {
    /// A document with nothing saved yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A document that already holds `layouts`.
    pub fn with(layouts: LayoutMap) -> Self {
        Self {
            layouts: Mutex::new(Some(layouts)),
            saves: Mutex::new(0),
        }
    }

    /// The most recently saved map.
    pub fn current(&self) -> Option<LayoutMap> {
        self.layouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LayoutDocument for MemoryDocument {
    async fn load(&self) -> Result<Option<LayoutMap>, StoreError> {
        Ok(self.current())
    }

    async fn save(&self, layouts: &LayoutMap) -> Result<(), StoreError> {
        *self.layouts.lock().unwrap_or_else(PoisonError::into_inner) = Some(layouts.clone());
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
