//! Test fixtures for common test scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A source tree to write into a temporary directory.
#[derive(Debug, Clone, Default)]
pub struct ProjectFixture {
    /// Files (path relative to project root -> content).
    files: BTreeMap<PathBuf, String>,
    /// Optional directory, inside the temp dir, that acts as project root.
    subdir: Option<PathBuf>,
}

impl ProjectFixture {
    /// Create an empty project fixture.
    pub fn new() -> Self {
        ProjectFixture::default()
    }

    /// Add a file.
    pub fn file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Place the project in a subdirectory of the temp dir.
    pub fn in_subdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.subdir = Some(dir.into());
        self
    }

    /// Write every file to a fresh temporary directory.
    pub fn write(&self) -> WrittenProject {
        let tmp = TempDir::new().unwrap();
        let root = match &self.subdir {
            Some(dir) => tmp.path().join(dir),
            None => tmp.path().to_path_buf(),
        };
        fs::create_dir_all(&root).unwrap();

        for (rel, content) in &self.files {
            let path = root.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
        }

        WrittenProject { _tmp: tmp, root }
    }
}

/// A project fixture on disk. Removed when dropped.
#[derive(Debug)]
pub struct WrittenProject {
    _tmp: TempDir,
    root: PathBuf,
}

impl WrittenProject {
    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a file relative to the project root.
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// Canonical path of an existing file.
    pub fn canonical(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.path(rel).canonicalize().unwrap()
    }
}

/// A fake runtime install: an executable, its `libraries/` directory and a
/// wrapper stub, all with recognizable byte contents.
#[derive(Debug, Clone)]
pub struct RuntimeFixture {
    pub runtime_bytes: Vec<u8>,
    pub wrapper_bytes: Vec<u8>,
    pub stdlib: BTreeMap<PathBuf, String>,
}

impl RuntimeFixture {
    /// Runtime with a `std` library and binary-looking contents.
    pub fn new() -> Self {
        let mut stdlib = BTreeMap::new();
        stdlib.insert(PathBuf::from("std/lib.spwn"), "return { ...$ }\n".to_string());
        stdlib.insert(PathBuf::from("std/util.spwn"), "return {}\n".to_string());

        RuntimeFixture {
            runtime_bytes: b"RUNTIME\0\x7fELF\0spwn".to_vec(),
            wrapper_bytes: b"WRAPPER\0stub".to_vec(),
            stdlib,
        }
    }

    /// Write the runtime install to a fresh temporary directory.
    pub fn write(&self) -> WrittenRuntime {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("bin");
        let stdlib = bin.join("libraries");
        let containers = tmp.path().join("containers");
        fs::create_dir_all(&stdlib).unwrap();
        fs::create_dir_all(&containers).unwrap();

        let exe = bin.join("spwn");
        fs::write(&exe, &self.runtime_bytes).unwrap();
        let wrapper = containers.join("linux");
        fs::write(&wrapper, &self.wrapper_bytes).unwrap();

        for (rel, content) in &self.stdlib {
            let path = stdlib.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
        }

        WrittenRuntime {
            _tmp: tmp,
            exe,
            stdlib,
            wrapper,
            containers,
        }
    }
}

impl Default for RuntimeFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A runtime fixture on disk. Removed when dropped.
#[derive(Debug)]
pub struct WrittenRuntime {
    _tmp: TempDir,
    pub exe: PathBuf,
    pub stdlib: PathBuf,
    pub wrapper: PathBuf,
    pub containers: PathBuf,
}
