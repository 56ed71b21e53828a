//! Implementation of `spwn-cmpl resolve`, and the resolution half of
//! `spwn-cmpl build`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{EntryKind, PackageManifest};
use crate::resolver::ImportResolver;
use crate::util::fs::expand_includes;

/// Options for resolving a program's files.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Entry source file
    pub entry: PathBuf,

    /// Extra files, directories or glob patterns to include verbatim
    pub includes: Vec<PathBuf>,

    /// Runtime standard library; bare imports found there are not packaged
    pub stdlib: Option<PathBuf>,
}

/// Resolved program files.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Files found by following imports, in discovery order
    pub imports: Vec<PathBuf>,

    /// Everything that goes into the payload
    pub manifest: PackageManifest,
}

/// Follow imports from the entry file and compose the package manifest.
///
/// Relative paths in `opts` are taken relative to `cwd`.
pub fn resolve(opts: &ResolveOptions, cwd: &Path) -> Result<Resolved> {
    let entry = cwd.join(&opts.entry);

    let mut resolver = ImportResolver::new();
    if let Some(stdlib) = &opts.stdlib {
        resolver = resolver.with_stdlib(stdlib);
    }

    tracing::info!("Recursively searching files for libraries");
    let imports = resolver.resolve(&entry)?;

    let includes = expand_includes(cwd, &opts.includes)?;
    let manifest = PackageManifest::compose(&entry, &imports, &includes)?;

    tracing::info!(
        "Found {} imported files, {} extra files",
        manifest.count(EntryKind::Import),
        manifest.count(EntryKind::Include)
    );
    for entry in manifest.entries() {
        tracing::debug!("  {:?} {}", entry.kind, entry.source.display());
    }

    Ok(Resolved { imports, manifest })
}
