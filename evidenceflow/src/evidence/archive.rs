//! Timestamped raw markup snapshots.

use crate::errors::EvidenceError;
use crate::utils::{create_unique, file_stamp, now_utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes captured markup to `raw_YYYYMMDD_HHMMSS.html` files.
#[derive(Debug, Clone)]
pub struct EvidenceArchive {
    dir: PathBuf,
}

impl EvidenceArchive {
    /// Creates an archive rooted at `dir`. The directory is created lazily.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The archive directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stores one snapshot and returns its path.
    ///
    /// Two captures in the same second get distinct names; the later one
    /// gains a numeric suffix.
    pub fn store(&self, html: &str) -> Result<PathBuf, EvidenceError> {
        fs::create_dir_all(&self.dir).map_err(|source| EvidenceError::Archive {
            path: self.dir.clone(),
            source,
        })?;

        let stamp = file_stamp(&now_utc());
        let (path, mut file) = create_unique(&self.dir, &format!("raw_{stamp}"), "html")
            .map_err(|source| EvidenceError::Archive {
                path: self.dir.clone(),
                source,
            })?;
        file.write_all(html.as_bytes())
            .map_err(|source| EvidenceError::Archive {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), bytes = html.len(), "Evidence saved");
        Ok(path)
    }
}
