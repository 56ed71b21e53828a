//! Configuration file support for spwn-cmpl.
//!
//! Two configuration file locations are supported:
//! - Global: `~/.spwn-cmpl/config.toml` - User-wide defaults
//! - Project: `.spwn-cmpl/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::footer::DEFAULT_SUBCOMMAND;
use crate::core::Platform;

/// Name of the runtime executable looked up on `PATH`.
pub const DEFAULT_RUNTIME_NAME: &str = "spwn";

/// Directory name of per-user and per-project configuration.
pub const CONFIG_DIR_NAME: &str = ".spwn-cmpl";

/// spwn-cmpl configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Runtime executable settings
    pub runtime: RuntimeConfig,

    /// Artifact build settings
    pub build: BuildConfig,
}

/// Where to find the runtime executable and its standard library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Executable name to look up on PATH (default: `spwn`)
    pub name: Option<String>,

    /// Explicit runtime executable; skips the PATH lookup
    pub path: Option<PathBuf>,

    /// Standard library directory (default: `libraries` next to the runtime)
    pub stdlib: Option<PathBuf>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory for artifacts (default: `./bin`)
    pub out_dir: Option<PathBuf>,

    /// Runtime subcommand written into the footer (default: `b`)
    pub subcommand: Option<String>,

    /// Default arguments passed through to the runtime
    pub args: Option<String>,

    /// Directory holding the platform wrapper stubs
    pub containers_dir: Option<PathBuf>,

    /// Explicit wrapper stub; overrides `containers_dir`
    pub wrapper: Option<PathBuf>,

    /// Platform to build for (default: the host)
    pub platform: Option<Platform>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Runtime settings
        if other.runtime.name.is_some() {
            self.runtime.name = other.runtime.name;
        }
        if other.runtime.path.is_some() {
            self.runtime.path = other.runtime.path;
        }
        if other.runtime.stdlib.is_some() {
            self.runtime.stdlib = other.runtime.stdlib;
        }

        // Build settings
        if other.build.out_dir.is_some() {
            self.build.out_dir = other.build.out_dir;
        }
        if other.build.subcommand.is_some() {
            self.build.subcommand = other.build.subcommand;
        }
        if other.build.args.is_some() {
            self.build.args = other.build.args;
        }
        if other.build.containers_dir.is_some() {
            self.build.containers_dir = other.build.containers_dir;
        }
        if other.build.wrapper.is_some() {
            self.build.wrapper = other.build.wrapper;
        }
        if other.build.platform.is_some() {
            self.build.platform = other.build.platform;
        }
    }

    /// Runtime executable name.
    pub fn runtime_name(&self) -> &str {
        self.runtime.name.as_deref().unwrap_or(DEFAULT_RUNTIME_NAME)
    }

    /// Footer subcommand.
    pub fn subcommand(&self) -> &str {
        self.build.subcommand.as_deref().unwrap_or(DEFAULT_SUBCOMMAND)
    }

    /// Artifact output directory.
    pub fn out_dir(&self) -> PathBuf {
        self.build
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("bin"))
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.spwn-cmpl/config.toml)
/// 2. Global config (~/.spwn-cmpl/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if let Some(global_path) = global_path.filter(|p| p.exists()) {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global config directory (~/.spwn-cmpl).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME))
}

/// Get the global config path (~/.spwn-cmpl/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.spwn-cmpl/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join("config.toml")
}
