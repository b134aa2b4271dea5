//! Atomic document writes

use crate::{Error, NormalizedPath, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Replace a document's content in one step.
///
/// The content is synced to a temp file next to the document and renamed
/// over it, so readers see either the old or the new document. Writers of
/// the same document are serialized through a sidecar lock file
/// (`.<name>.lock`) held from the temp write until the rename.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();
    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let _lock = DocumentLock::acquire(&native_path)?;
    let temp_path = sibling(&native_path, "tmp");
    write_synced(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, &native_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&native_path, e));
    }

    tracing::debug!(path = %path, bytes = content.len(), "Replaced document");
    Ok(())
}

/// Read a whole document as UTF-8 text.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// `.<file name>.<suffix>` in the document's directory.
fn sibling(document: &Path, suffix: &str) -> PathBuf {
    let name = document
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    document.with_file_name(format!(".{name}.{suffix}"))
}

fn write_synced(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| Error::io(path, e))?;
    file.write_all(content).map_err(|e| Error::io(path, e))?;
    file.sync_all().map_err(|e| Error::io(path, e))
}

/// Exclusive advisory lock guarding one document. Released on drop.
struct DocumentLock {
    file: File,
}

impl DocumentLock {
    fn acquire(document: &Path) -> Result<Self> {
        let lock_path = sibling(document, "lock");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| Error::io(&lock_path, e))?;
        file.lock_exclusive().map_err(|_| Error::LockFailed {
            path: document.to_path_buf(),
        })?;
        Ok(Self { file })
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn write_creates_parents_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path()).join("nested/stagecfg.json");

        write_atomic(&path, b"{}").unwrap();

        assert_eq!(read_text(&path).unwrap(), "{}");
        let native = path.to_native();
        assert!(!sibling(&native, "tmp").exists());
        assert!(sibling(&native, "lock").exists());
    }

    #[test]
    fn concurrent_writers_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path()).join("stagecfg.json");
        let contents: Vec<String> = (0..8)
            .map(|i| format!("{{\"writer\": {i}, \"pad\": \"{}\"}}", "x".repeat(4096)))
            .collect();

        thread::scope(|scope| {
            for content in &contents {
                let path = path.clone();
                scope.spawn(move || write_atomic(&path, content.as_bytes()).unwrap());
            }
        });

        let written = read_text(&path).unwrap();
        assert!(contents.contains(&written));
    }
}
