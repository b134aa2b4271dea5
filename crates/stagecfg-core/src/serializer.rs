//! Boundary between the entity graph and durable storage
//!
//! A serializer only moves plain data; turning it into typed entities is
//! the job of [`Project::from_object`](crate::Project::from_object).

use crate::{Error, Result};
use serde_json::Value;
use stagecfg_fs::{DocumentStore, NormalizedPath};
use std::sync::{Arc, Mutex};

/// Default document name for [`FileSystemSerializer`].
pub const DEFAULT_DOCUMENT: &str = "stagecfg.json";

/// Reads and writes the plain-data form of a project.
pub trait ProjectSerializer: Send + Sync {
    /// Produce the stored plain data for the project at `root`.
    fn deserialize(&self, root: Option<&NormalizedPath>) -> Result<Value>;

    /// Persist `data` for the project at `root`.
    fn serialize(&self, root: Option<&NormalizedPath>, data: &Value) -> Result<()>;
}

/// Stores the project as a single document under the project root.
///
/// The document's extension selects JSON, YAML or TOML. TOML cannot hold
/// `null`, so a project with a `null` value anywhere only saves as JSON or
/// YAML; as TOML it fails with [`stagecfg_fs::Error::NullValue`].
#[derive(Debug, Clone)]
pub struct FileSystemSerializer {
    document: String,
    store: DocumentStore,
}

impl Default for FileSystemSerializer {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT)
    }
}

impl FileSystemSerializer {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            store: DocumentStore::new(),
        }
    }

    /// Path of the project document below `root`.
    pub fn document_path(&self, root: Option<&NormalizedPath>) -> Result<NormalizedPath> {
        root.map(|r| r.join(&self.document))
            .ok_or(Error::ProjectRootNotSet)
    }
}

impl ProjectSerializer for FileSystemSerializer {
    fn deserialize(&self, root: Option<&NormalizedPath>) -> Result<Value> {
        let path = self.document_path(root)?;
        tracing::debug!(%path, "Reading project document");
        Ok(self.store.load(&path)?)
    }

    fn serialize(&self, root: Option<&NormalizedPath>, data: &Value) -> Result<()> {
        let path = self.document_path(root)?;
        tracing::debug!(%path, "Writing project document");
        Ok(self.store.save(&path, data)?)
    }
}

/// Keeps the last saved document in memory.
///
/// Clones share the same document, so one handle can be given to a
/// [`ProjectContext`](crate::ProjectContext) and another kept for
/// inspection.
#[derive(Debug, Clone, Default)]
pub struct MemorySerializer {
    document: Arc<Mutex<Option<Value>>>,
}

impl MemorySerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A serializer that already holds `data`, as if it had been saved.
    pub fn with_document(data: Value) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(data))),
        }
    }

    /// The currently stored document, if any.
    pub fn document(&self) -> Option<Value> {
        self.document.lock().ok().and_then(|guard| guard.clone())
    }
}

impl ProjectSerializer for MemorySerializer {
    fn deserialize(&self, _root: Option<&NormalizedPath>) -> Result<Value> {
        let guard = self.document.lock().map_err(|e| Error::Serializer {
            message: e.to_string(),
        })?;
        guard.clone().ok_or_else(|| Error::Serializer {
            message: "no project document has been saved".to_string(),
        })
    }

    fn serialize(&self, _root: Option<&NormalizedPath>, data: &Value) -> Result<()> {
        let mut guard = self.document.lock().map_err(|e| Error::Serializer {
            message: e.to_string(),
        })?;
        *guard = Some(data.clone());
        Ok(())
    }
}
