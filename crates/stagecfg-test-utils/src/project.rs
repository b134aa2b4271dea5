//! [`TestProject`]: a temporary project root for serializer and population tests.

use stagecfg_core::{FileSystemSerializer, Project, ProjectContext, ResourceTeardown};
use stagecfg_fs::NormalizedPath;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// A temporary directory acting as a project root, with a matching
/// [`ProjectContext`].
///
/// # Example
///
/// ```rust,no_run
/// use stagecfg_test_utils::{TestProject, fixtures};
///
/// let test = TestProject::new();
/// let project = test.save_fixture(&fixtures::billing_project());
/// test.assert_file_exists("stagecfg.json");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
    context: ProjectContext,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// A project root using the default JSON document.
    pub fn new() -> Self {
        Self::with_serializer(FileSystemSerializer::default())
    }

    /// A project root whose context uses `serializer`.
    pub fn with_serializer(serializer: FileSystemSerializer) -> Self {
        let temp_dir = TempDir::new().expect("TestProject::new: failed to create temp dir");
        let context = ProjectContext::new()
            .with_root(NormalizedPath::new(temp_dir.path()))
            .with_serializer(Arc::new(serializer));
        Self { temp_dir, context }
    }

    /// Replace the teardown hook used by the context.
    pub fn with_teardown(mut self, teardown: Arc<dyn ResourceTeardown>) -> Self {
        self.context = self.context.with_teardown(teardown);
        self
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }

    /// Build a project from `data`, save it, and return it.
    pub fn save_fixture(&self, data: &serde_json::Value) -> Project {
        let project = Project::from_object(data).expect("fixture should be valid project data");
        project
            .save(&self.context)
            .expect("TestProject::save_fixture: save failed");
        project
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
