//! Normalized path handling for project roots and the files beneath them

use std::path::{Path, PathBuf};

/// A path stored with forward slashes.
///
/// Project roots come from process-wide configuration and are joined with
/// relative segments by callers that want to reach files inside a project.
/// Keeping one separator internally makes those joins predictable; the
/// platform form is produced only at I/O boundaries via [`to_native`].
///
/// [`to_native`]: NormalizedPath::to_native
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath, converting backslashes to forward slashes.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let normalized = path.as_ref().to_string_lossy().replace('\\', "/");
        Self { inner: normalized }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join a single relative segment onto this path.
    ///
    /// Separators at the seam are collapsed so `"a/"` joined with `"/b"`
    /// yields `"a/b"`. Empty segments leave the path unchanged.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            return self.clone();
        }
        if self.inner.is_empty() {
            return Self {
                inner: segment.to_string(),
            };
        }
        let base = self.inner.trim_end_matches('/');
        let inner = if base.is_empty() {
            // root "/"
            format!("/{segment}")
        } else {
            format!("{base}/{segment}")
        };
        Self { inner }
    }

    /// Join several segments in order.
    pub fn join_all<S: AsRef<str>>(&self, segments: &[S]) -> Self {
        segments
            .iter()
            .fold(self.clone(), |path, segment| path.join(segment.as_ref()))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Get the extension if present. Dotfiles such as `.env` have none.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        })
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_collapses_separators_at_the_seam() {
        let root = NormalizedPath::new("/srv/app/");
        assert_eq!(root.join("/functions").as_str(), "/srv/app/functions");
    }

    #[test]
    fn join_on_filesystem_root() {
        let root = NormalizedPath::new("/");
        assert_eq!(root.join("etc").as_str(), "/etc");
    }

    #[test]
    fn backslashes_are_normalized() {
        let path = NormalizedPath::new("C:\\work\\proj");
        assert_eq!(path.as_str(), "C:/work/proj");
        assert_eq!(path.join("a\\b").as_str(), "C:/work/proj/a/b");
    }

    #[test]
    fn dotfile_has_no_extension() {
        assert_eq!(NormalizedPath::new("/p/.env").extension(), None);
        assert_eq!(NormalizedPath::new("/p/s-project.json").extension(), Some("json"));
    }
}
