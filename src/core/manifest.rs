//! The list of files embedded in an artifact's payload.
//!
//! A manifest is composed from the resolver's output, any extra includes the
//! user asked for, and the entry file itself. Each file is stored in the
//! payload relative to the manifest's staging root, the deepest directory
//! that contains every file.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::util::fs::common_ancestor;

/// Why a file is part of the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Discovered by following imports.
    Import,
    /// Explicitly included; never scanned for imports.
    Include,
    /// The program's entry file.
    Entry,
}

/// A single file to embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Canonical path on disk.
    pub source: PathBuf,
    /// Path inside the payload, relative to the staging root.
    pub archive_path: PathBuf,
    pub kind: EntryKind,
}

impl ManifestEntry {
    /// Archive path with `/` separators, as stored in the zip.
    pub fn archive_name(&self) -> String {
        archive_name(&self.archive_path)
    }
}

/// Files to embed, in payload order.
#[derive(Debug, Clone, Serialize)]
pub struct PackageManifest {
    root: PathBuf,
    entries: Vec<ManifestEntry>,
}

impl PackageManifest {
    /// Compose `resolved ∪ includes ∪ entry`.
    ///
    /// Duplicates (by canonical path) keep their first position, except the
    /// entry file, which always appears exactly once and last.
    pub fn compose(entry: &Path, resolved: &[PathBuf], includes: &[PathBuf]) -> Result<Self> {
        let entry_canon = canonical(entry, EntryKind::Entry)?;

        let mut seen = HashSet::new();
        seen.insert(entry_canon.clone());

        let mut files = Vec::with_capacity(resolved.len() + includes.len() + 1);
        let tagged = resolved
            .iter()
            .map(|p| (p, EntryKind::Import))
            .chain(includes.iter().map(|p| (p, EntryKind::Include)));

        for (path, kind) in tagged {
            let canon = canonical(path, kind)?;
            if canon.is_dir() {
                bail!("cannot embed directory `{}` as a file", path.display());
            }
            if seen.insert(canon.clone()) {
                files.push((canon, kind));
            } else {
                tracing::debug!("Skipping duplicate manifest entry {}", path.display());
            }
        }
        files.push((entry_canon, EntryKind::Entry));

        let root = common_ancestor(files.iter().filter_map(|(p, _)| p.parent()))
            .context("manifest files do not share a common root directory")?;

        let entries = files
            .into_iter()
            .map(|(source, kind)| {
                let archive_path = source
                    .strip_prefix(&root)
                    .map(Path::to_path_buf)
                    .with_context(|| {
                        format!("{} is outside of {}", source.display(), root.display())
                    })?;
                Ok(ManifestEntry {
                    source,
                    archive_path,
                    kind,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PackageManifest { root, entries })
    }

    /// Directory every archive path is relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All entries, entry file last.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// The program's entry file.
    pub fn entry(&self) -> Option<&ManifestEntry> {
        self.entries.last().filter(|e| e.kind == EntryKind::Entry)
    }

    /// Number of files.
    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    /// Count of entries of one kind.
    pub fn count(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

fn canonical(path: &Path, kind: EntryKind) -> Result<PathBuf> {
    let what = match kind {
        EntryKind::Entry => "entry file",
        EntryKind::Import => "imported file",
        EntryKind::Include => "included file",
    };
    path.canonicalize()
        .with_context(|| format!("{} not found: {}", what, path.display()))
}

/// Join path components with `/`, dropping prefixes and roots.
pub fn archive_name(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
