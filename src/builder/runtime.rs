//! Locating the runtime executable, its standard library and the wrapper stub.

use std::path::{Path, PathBuf};

use crate::builder::errors::BuildError;
use crate::core::Platform;

/// Standard library directory name, next to the runtime executable.
pub const STDLIB_DIR: &str = "libraries";

/// Finds an executable by name.
///
/// The default looks on `PATH`; tests and `--runtime` use a fixed path.
pub trait RuntimeLocator {
    fn locate(&self, name: &str) -> Result<PathBuf, BuildError>;
}

/// Looks up executables on `PATH` (`which` / `where`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLookup;

impl RuntimeLocator for PathLookup {
    fn locate(&self, name: &str) -> Result<PathBuf, BuildError> {
        which::which(name).map_err(|e| {
            tracing::debug!("PATH lookup for `{}` failed: {}", name, e);
            BuildError::RuntimeNotFound {
                name: name.to_string(),
            }
        })
    }
}

/// Always returns the same executable.
#[derive(Debug, Clone)]
pub struct FixedRuntime(pub PathBuf);

impl RuntimeLocator for FixedRuntime {
    fn locate(&self, _name: &str) -> Result<PathBuf, BuildError> {
        if self.0.is_file() {
            Ok(self.0.clone())
        } else {
            Err(BuildError::MissingRuntime {
                path: self.0.clone(),
            })
        }
    }
}

/// A runtime executable and the standard library shipped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInstall {
    pub exe: PathBuf,
    pub stdlib: PathBuf,
}

impl RuntimeInstall {
    /// Locate `name` and its sibling `libraries/` directory.
    ///
    /// If the located executable is a symlink whose own directory has no
    /// standard library, the link target's directory is tried as well.
    pub fn discover(locator: &dyn RuntimeLocator, name: &str) -> Result<Self, BuildError> {
        let exe = locator.locate(name)?;
        let stdlib = stdlib_next_to(&exe)
            .or_else(|| exe.canonicalize().ok().and_then(|real| stdlib_next_to(&real)))
            .unwrap_or_else(|| sibling(&exe, STDLIB_DIR));

        tracing::debug!("Runtime: {}", exe.display());
        tracing::debug!("Standard library: {}", stdlib.display());

        Ok(RuntimeInstall { exe, stdlib })
    }

    /// Override the standard library directory.
    pub fn with_stdlib(mut self, stdlib: impl Into<PathBuf>) -> Self {
        self.stdlib = stdlib.into();
        self
    }

    /// Check both parts exist.
    pub fn validate(&self) -> Result<(), BuildError> {
        if !self.exe.is_file() {
            return Err(BuildError::MissingRuntime {
                path: self.exe.clone(),
            });
        }
        if !self.stdlib.is_dir() {
            return Err(BuildError::MissingStdlib {
                path: self.stdlib.clone(),
            });
        }
        Ok(())
    }
}

/// Wrapper stub for `platform` inside a containers directory.
pub fn wrapper_path(containers_dir: &Path, platform: Platform) -> PathBuf {
    containers_dir.join(platform.as_str())
}

fn sibling(exe: &Path, name: &str) -> PathBuf {
    exe.parent().unwrap_or(Path::new(".")).join(name)
}

fn stdlib_next_to(exe: &Path) -> Option<PathBuf> {
    let dir = sibling(exe, STDLIB_DIR);
    dir.is_dir().then_some(dir)
}
