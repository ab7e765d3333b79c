//! Source document persistence.
//!
//! Documents live as flat files under a single source root:
//! `<root>/<title>.<ext>`. Saves are last-write-wins; a temp-then-rename
//! write keeps half-written content invisible to concurrent readers.

use crate::ident::DocumentId;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filesystem errors from the source and artifact stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("`{0}` does not exist")]
    NotFound(PathBuf),

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] io::Error),
}

/// Persists literate source documents under a root directory.
#[derive(Debug, Clone)]
pub struct SourceStore {
    root: PathBuf,
    extension: String,
}

impl SourceStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Absolute-or-relative path of a document's source file.
    pub fn path_for(&self, id: &DocumentId) -> PathBuf {
        self.root
            .join(format!("{}.{}", id.file_stem(), self.extension))
    }

    /// Write `content` as the complete contents of the document's file,
    /// replacing any previous version. Creates the root directory (and all
    /// parents) on first use.
    ///
    /// Returns the path written. The write goes to a sibling temp file first
    /// and is renamed into place, so a concurrent [`load`](Self::load) sees
    /// either the old content or the new, never a prefix.
    pub fn save(&self, id: &DocumentId, content: &str) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::Io(self.root.clone(), e))?;

        let path = self.path_for(id);
        let tmp = self.root.join(format!(
            ".{}.{}.tmp",
            id.file_stem(),
            std::process::id()
        ));

        fs::write(&tmp, content).map_err(|e| StoreError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            StoreError::Io(path.clone(), e)
        })?;

        Ok(path)
    }

    /// Read a document's full source text for the edit view.
    pub fn load(&self, id: &DocumentId) -> Result<String, StoreError> {
        let path = self.path_for(id);
        read_to_string(&path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Read a file, mapping `NotFound` apart from other IO failures.
pub fn read_to_string(path: &Path) -> Result<String, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(StoreError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(StoreError::Io(path.to_path_buf(), e)),
    }
}

/// Byte-wise variant of [`read_to_string`].
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(StoreError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(StoreError::Io(path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> SourceStore {
        SourceStore::new(dir.path().join("src"), "nw")
    }

    fn id(title: &str) -> DocumentId {
        DocumentId::parse(title).unwrap()
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let path = store.save(&id("Intro"), "hello").unwrap();
        assert_eq!(path.file_name().unwrap(), "Intro.nw");
        assert_eq!(store.load(&id("Intro")).unwrap(), "hello");
    }

    #[test]
    fn test_roundtrip_preserves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        for content in ["", "héllo wörld\n", "line1\r\nline2\n\ttabbed", "λόγος"] {
            store.save(&id("Doc"), content).unwrap();
            assert_eq!(store.load(&id("Doc")).unwrap(), content);
        }
    }

    #[test]
    fn test_save_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.save(&id("Intro"), "same").unwrap();
        store.save(&id("Intro"), "same").unwrap();

        assert_eq!(store.load(&id("Intro")).unwrap(), "same");
        let entries: Vec<_> = fs::read_dir(store.root()).unwrap().collect();
        assert_eq!(entries.len(), 1, "no temp files left behind");
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.save(&id("Intro"), "first").unwrap();
        store.save(&id("Intro"), "second").unwrap();
        assert_eq!(store.load(&id("Intro")).unwrap(), "second");
    }

    #[test]
    fn test_save_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = SourceStore::new(dir.path().join("a/b/c"), "nw");

        store.save(&id("Deep"), "x").unwrap();
        assert!(dir.path().join("a/b/c/Deep.nw").is_file());
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        assert!(matches!(
            store.load(&id("Nope")),
            Err(StoreError::NotFound(_))
        ));
    }
}
