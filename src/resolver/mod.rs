//! Import resolution.
//!
//! Turns an entry file into the ordered list of source files it needs by
//! scanning for import statements and following them depth-first. Each file
//! is visited once (keyed by canonical path), so shared dependencies appear
//! once and import cycles terminate.

pub mod errors;
pub mod scan;

pub use errors::ResolveError;
pub use scan::{ImportReference, ImportScanner};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::util::config::DEFAULT_RUNTIME_NAME;

/// Library provided by the runtime itself; never packaged.
pub const RESERVED_LIBRARY: &str = "gamescene";

/// Source file extension.
pub const SOURCE_EXTENSION: &str = "spwn";

/// Directory, next to the importing file, that holds bare-name libraries.
pub const LIBRARY_DIR: &str = "libraries";

/// Entry file of a library directory.
pub const LIBRARY_ENTRY: &str = "lib.spwn";

/// Where an import reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A file to package and scan.
    File(PathBuf),
    /// The reserved runtime library; skipped.
    Reserved,
    /// A library shipped with the runtime's standard library; skipped.
    Stdlib(PathBuf),
}

/// Resolves the transitive imports of an entry file.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    scanner: ImportScanner,
    stdlib_dir: Option<PathBuf>,
}

impl ImportResolver {
    /// Create a resolver with no standard library.
    pub fn new() -> Self {
        ImportResolver {
            scanner: ImportScanner::new(),
            stdlib_dir: None,
        }
    }

    /// Treat bare imports found in this standard library as already bundled.
    pub fn with_stdlib(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stdlib_dir = Some(dir.into());
        self
    }

    /// Resolve every file reachable from `entry`, in depth-first order.
    ///
    /// The entry file itself is not part of the result.
    pub fn resolve(&self, entry: &Path) -> Result<Vec<PathBuf>, ResolveError> {
        let entry = canonical(entry).ok_or_else(|| ResolveError::MissingSourceFile {
            path: entry.to_path_buf(),
            imported_from: None,
            statement: None,
        })?;

        let mut visited = HashSet::new();
        visited.insert(entry.clone());

        let mut found = Vec::new();
        self.visit(&entry, &mut visited, &mut found)?;
        Ok(found)
    }

    fn visit(
        &self,
        file: &Path,
        visited: &mut HashSet<PathBuf>,
        found: &mut Vec<PathBuf>,
    ) -> Result<(), ResolveError> {
        let bytes = std::fs::read(file).map_err(|source| ResolveError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        let dir = file.parent().unwrap_or(Path::new("."));

        for reference in self.scanner.scan(&text) {
            let path = match self.resolve_reference(dir, &reference) {
                Resolution::File(path) => path,
                Resolution::Reserved => {
                    tracing::debug!("Skipping `{}` (provided by the runtime)", reference.raw_match);
                    continue;
                }
                Resolution::Stdlib(path) => {
                    tracing::debug!(
                        "`{}` resolves to the standard library ({})",
                        reference.raw_match,
                        path.display()
                    );
                    continue;
                }
            };

            let resolved = canonical(&path).ok_or_else(|| ResolveError::MissingSourceFile {
                path: path.clone(),
                imported_from: Some(file.to_path_buf()),
                statement: Some(reference.raw_match.clone()),
            })?;

            if !visited.insert(resolved.clone()) {
                tracing::debug!("Already visited {}", resolved.display());
                continue;
            }

            tracing::debug!("Found import {} in {}", resolved.display(), file.display());
            found.push(resolved.clone());
            self.visit(&resolved, visited, found)?;
        }

        Ok(())
    }

    /// Map one import reference, found in a file inside `dir`, to a path.
    pub fn resolve_reference(&self, dir: &Path, reference: &ImportReference) -> Resolution {
        let name = reference.target_name.as_str();

        if name == RESERVED_LIBRARY {
            return Resolution::Reserved;
        }

        // Any name mentioning the runtime (`main.spwn`) is a file, even
        // without a directory prefix.
        let file_like = name.to_lowercase().contains(DEFAULT_RUNTIME_NAME);

        if reference.is_relative() || file_like {
            let base = dir.join(reference.relative_prefix.as_deref().unwrap_or(""));
            let path = base.join(name);

            if !path.exists() && Path::new(name).extension().is_none() {
                let with_ext = base.join(format!("{}.{}", name, SOURCE_EXTENSION));
                if with_ext.exists() {
                    return Resolution::File(with_ext);
                }
            }
            return Resolution::File(path);
        }

        let local = dir.join(LIBRARY_DIR).join(name).join(LIBRARY_ENTRY);
        if !local.exists() {
            if let Some(stdlib) = &self.stdlib_dir {
                let bundled = stdlib.join(name).join(LIBRARY_ENTRY);
                if bundled.exists() {
                    return Resolution::Stdlib(bundled);
                }
            }
        }
        Resolution::File(local)
    }
}

impl Default for ImportResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical(path: &Path) -> Option<PathBuf> {
    path.canonicalize().ok().filter(|p| p.is_file())
}
