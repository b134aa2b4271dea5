//! Services handed explicitly to the project operations that need them

use crate::model::{Region, Stage};
use crate::serializer::{FileSystemSerializer, ProjectSerializer};
use crate::{Error, Result};
use async_trait::async_trait;
use stagecfg_fs::NormalizedPath;
use std::sync::Arc;

/// Hook that frees the infrastructure behind a stage once it has been
/// detached from its project.
///
/// Implementations talk to the deployment provider. A returned error is
/// surfaced through the future of
/// [`Project::remove_stage`](crate::Project::remove_stage); the stage stays
/// detached regardless.
#[async_trait]
pub trait ResourceTeardown: Send + Sync {
    async fn teardown_region(&self, stage: &str, region: &Region) -> Result<()>;

    async fn teardown_stage(&self, _stage: &Stage) -> Result<()> {
        Ok(())
    }
}

/// Teardown hook that releases nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTeardown;

#[async_trait]
impl ResourceTeardown for NoopTeardown {
    async fn teardown_region(&self, _stage: &str, _region: &Region) -> Result<()> {
        Ok(())
    }
}

/// Configuration and collaborators for a project.
///
/// Holds the project root (set by the surrounding tooling), the serializer
/// used by [`Project::load`](crate::Project::load) /
/// [`Project::save`](crate::Project::save), and the teardown hook used when
/// stages are removed.
#[derive(Clone)]
pub struct ProjectContext {
    root: Option<NormalizedPath>,
    serializer: Arc<dyn ProjectSerializer>,
    teardown: Arc<dyn ResourceTeardown>,
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectContext {
    /// A context with no root, the filesystem serializer and a no-op teardown.
    pub fn new() -> Self {
        Self {
            root: None,
            serializer: Arc::new(FileSystemSerializer::default()),
            teardown: Arc::new(NoopTeardown),
        }
    }

    pub fn with_root(mut self, root: impl Into<NormalizedPath>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn ProjectSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_teardown(mut self, teardown: Arc<dyn ResourceTeardown>) -> Self {
        self.teardown = teardown;
        self
    }

    /// The configured project root, if any.
    pub fn root_path(&self) -> Option<&NormalizedPath> {
        self.root.as_ref()
    }

    pub fn has_project(&self) -> bool {
        self.root.is_some()
    }

    /// Join `segments` onto the project root.
    ///
    /// # Errors
    ///
    /// [`Error::ProjectRootNotSet`] when no root is configured.
    pub fn file_path<S: AsRef<str>>(&self, segments: &[S]) -> Result<NormalizedPath> {
        self.root
            .as_ref()
            .map(|root| root.join_all(segments))
            .ok_or(Error::ProjectRootNotSet)
    }

    pub fn serializer(&self) -> &dyn ProjectSerializer {
        self.serializer.as_ref()
    }

    pub fn teardown(&self) -> Arc<dyn ResourceTeardown> {
        Arc::clone(&self.teardown)
    }
}

impl std::fmt::Debug for ProjectContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectContext")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_path_joins_onto_root() {
        let ctx = ProjectContext::new().with_root("/srv/billing");
        let path = ctx.file_path(&["functions", "users", "s-function.json"]).unwrap();
        assert_eq!(path.as_str(), "/srv/billing/functions/users/s-function.json");
    }

    #[test]
    fn file_path_without_root_fails() {
        let ctx = ProjectContext::new();
        assert!(!ctx.has_project());
        assert!(matches!(ctx.file_path(&["a"]), Err(Error::ProjectRootNotSet)));
    }
}
