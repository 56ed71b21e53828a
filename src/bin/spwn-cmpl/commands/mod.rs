//! Command implementations

pub mod build;
pub mod completions;
pub mod inspect;
pub mod resolve;
pub mod unpack;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spwn_cmpl::util::config::{global_config_path, load_config, project_config_path};
use spwn_cmpl::util::fs::relative_path;
use spwn_cmpl::util::Config;

/// Current directory plus the config merged for it.
pub fn context() -> Result<(PathBuf, Config)> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let config = load_config(global_config_path().as_deref(), &project_config_path(&cwd));
    Ok((cwd, config))
}

/// Path as shown to the user: relative to `cwd` when below it.
pub fn display_path(cwd: &Path, path: &Path) -> String {
    let base = cwd.canonicalize().unwrap_or_else(|_| cwd.to_path_buf());
    for base in [base.as_path(), cwd] {
        if path.starts_with(base) {
            return relative_path(base, path).display().to_string();
        }
    }
    path.display().to_string()
}
