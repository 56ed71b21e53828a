//! Temporary staging tree for the payload.
//!
//! Files are copied into `<tmp>/data/` in the layout the runtime expects
//! after extraction. The whole `<tmp>` directory is removed when the
//! [`StagingDir`] is dropped, whether or not the build succeeded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use crate::builder::errors::{BuildError, BuildStep};
use crate::builder::runtime::STDLIB_DIR;
use crate::core::ManifestEntry;

/// Name of the payload root inside the staging directory.
pub const DATA_DIR: &str = "data";

/// A scoped staging directory.
#[derive(Debug)]
pub struct StagingDir {
    tmp: TempDir,
    data: PathBuf,
}

impl StagingDir {
    /// Create a fresh staging directory with an empty `data/`.
    pub fn new() -> Result<Self, BuildError> {
        let tmp = tempfile::Builder::new()
            .prefix("spwn-cmpl-")
            .tempdir()
            .map_err(BuildError::io(BuildStep::CreateStaging, std::env::temp_dir()))?;

        let data = tmp.path().join(DATA_DIR);
        fs::create_dir(&data).map_err(BuildError::io(BuildStep::CreateStaging, &data))?;

        tracing::debug!("Staging in {}", tmp.path().display());
        Ok(StagingDir { tmp, data })
    }

    /// Outer temporary directory. Scratch files that must not end up in the
    /// payload go here.
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Payload root.
    pub fn data_dir(&self) -> &Path {
        &self.data
    }

    /// Copy the runtime's standard library into `data/libraries/`.
    ///
    /// Returns the number of files copied.
    pub fn copy_stdlib(&self, stdlib: &Path) -> Result<usize, BuildError> {
        copy_tree(stdlib, &self.data.join(STDLIB_DIR))
    }

    /// Copy one manifest file to `data/<archive path>`.
    ///
    /// Intermediate directories are created on demand; existing ones are
    /// reused.
    pub fn stage(&self, entry: &ManifestEntry) -> Result<PathBuf, BuildError> {
        let dst = self.data.join(&entry.archive_path);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(BuildError::io(BuildStep::StageFile, parent))?;
        }
        fs::copy(&entry.source, &dst).map_err(BuildError::io(BuildStep::StageFile, &entry.source))?;
        Ok(dst)
    }

    /// Remove the staging directory now, logging instead of failing.
    pub fn close(self) {
        let path = self.tmp.path().to_path_buf();
        if let Err(e) = self.tmp.close() {
            tracing::warn!("Failed to remove staging directory {}: {}", path.display(), e);
        }
    }
}

/// Copy `src` into `dst`, following symlinks. Errors name the entry that
/// failed rather than `src`.
fn copy_tree(src: &Path, dst: &Path) -> Result<usize, BuildError> {
    let step = BuildStep::CopyStdlib;
    let mut copied = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            BuildError::io(step, path)(io::Error::from(e))
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(BuildError::io(step, &target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(BuildError::io(step, entry.path()))?;
            copied += 1;
        }
    }

    Ok(copied)
}
