//! Implementation of `spwn-cmpl unpack`.
//!
//! Does what the wrapper stub does when the artifact is launched, short of
//! running anything: the runtime is written out as `run<ext>` and the payload
//! is extracted next to it.

use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::archive;
use crate::core::{ArtifactFooter, Platform};
use crate::ops::inspect::read_range;

/// File name of the extracted runtime, without extension.
pub const RUNTIME_FILE: &str = "run";

/// Result of unpacking an artifact.
#[derive(Debug, Clone)]
pub struct UnpackResult {
    /// Where the runtime was written
    pub runtime: PathBuf,

    /// Payload files written below the destination
    pub files: Vec<PathBuf>,

    /// Arguments the wrapper passes to the runtime
    pub command: String,
}

impl UnpackResult {
    /// Full command line the wrapper would run from the destination.
    pub fn launch_line(&self) -> String {
        format!("{} {}", self.runtime.display(), self.command)
    }
}

/// Unpack `artifact` into `dest`, creating it if needed.
pub fn unpack(artifact: &Path, dest: &Path, platform: Platform) -> Result<UnpackResult> {
    let mut file = File::open(artifact)
        .with_context(|| format!("failed to open {}", artifact.display()))?;
    let (footer, layout) = ArtifactFooter::read_from(&mut file)
        .with_context(|| format!("{} is not a spwn-cmpl artifact", artifact.display()))?;

    fs::create_dir_all(dest)
        .with_context(|| format!("failed to create directory: {}", dest.display()))?;

    let runtime_bytes = read_range(&mut file, &layout.runtime)?;
    let runtime = dest.join(format!("{}{}", RUNTIME_FILE, platform.exe_suffix()));
    fs::write(&runtime, &runtime_bytes)
        .with_context(|| format!("failed to write {}", runtime.display()))?;
    make_executable(&runtime)?;
    tracing::debug!("Wrote runtime ({} bytes)", runtime_bytes.len());

    let payload = read_range(&mut file, &layout.payload)?;
    let files = archive::extract(Cursor::new(payload), dest)
        .with_context(|| format!("failed to extract payload of {}", artifact.display()))?;
    tracing::debug!("Extracted {} files", files.len());

    Ok(UnpackResult {
        runtime,
        files,
        command: footer.command,
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
