//! Target platform identity.
//!
//! Only used to pick the wrapper stub and the executable extension of the
//! produced artifact. Defaults to the host; `--platform` and
//! `build.platform` in the config override it.

use serde::{Deserialize, Serialize};

/// Operating system the artifact is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Darwin,
    Linux,
    Unknown,
}

impl Platform {
    /// Detect the platform this binary was compiled for.
    pub fn host() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name to a platform.
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" | "darwin" => Platform::Darwin,
            "linux" => Platform::Linux,
            _ => Platform::Unknown,
        }
    }

    /// Lowercase platform name, which is also the wrapper stub's file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::Unknown => "unknown",
        }
    }

    /// Executable extension including the dot, or empty.
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            _ => "",
        }
    }

    /// Default file name of a built artifact (e.g. `linux`, `windows.exe`).
    pub fn default_artifact_name(&self) -> String {
        format!("{}{}", self.as_str(), self.exe_suffix())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_os(&s.to_lowercase()) {
            Platform::Unknown => Err(format!(
                "unknown platform '{}'; expected 'windows', 'darwin', or 'linux'",
                s
            )),
            p => Ok(p),
        }
    }
}
