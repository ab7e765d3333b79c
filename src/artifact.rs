//! Built artifact lookup.
//!
//! Artifacts are whatever the weaver last wrote: `<root>/<title>.html`.
//! Their existence is the only record of a completed build; a failed weave
//! can leave an artifact stale relative to its source, and readers see
//! whichever build last finished.

use crate::ident::{DocumentId, safe_filename};
use crate::store::{StoreError, read_bytes};
use std::path::{Path, PathBuf};

/// Read-only view over the destination root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path the weaver writes to for a validated document.
    pub fn path_for(&self, id: &DocumentId) -> PathBuf {
        self.root.join(format!("{}.html", id.file_stem()))
    }

    /// Fetch the built HTML for a raw title, as on the public page route.
    ///
    /// The title is normalized with the lossy filename form (this route
    /// only names a file, it never writes), `.html` is appended unless
    /// already present, and absence is reported as
    /// [`StoreError::NotFound`], never as an empty body.
    pub fn fetch(&self, title: &str) -> Result<Vec<u8>, StoreError> {
        let mut name = safe_filename(title);
        if name.is_empty() || name.starts_with('.') {
            return Err(StoreError::NotFound(self.root.join(name)));
        }
        if !name.ends_with(".html") {
            name.push_str(".html");
        }
        read_bytes(&self.root.join(name))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
