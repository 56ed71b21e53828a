//! `spwn-cmpl resolve` command
//!
//! Lists every file a build would package, in payload order. The runtime's
//! standard library is used to skip bare imports when the runtime can be
//! found; otherwise those imports must exist locally.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::ResolveArgs;
use crate::commands::{context, display_path};
use spwn_cmpl::builder::{FixedRuntime, PathLookup, RuntimeInstall, RuntimeLocator};
use spwn_cmpl::core::EntryKind;
use spwn_cmpl::ops::cmpl_resolve::{resolve, ResolveOptions};

#[derive(Serialize)]
struct JsonEntry {
    source: String,
    archive_path: String,
    kind: EntryKind,
}

pub fn execute(args: ResolveArgs) -> Result<()> {
    let (cwd, config) = context()?;

    let fixed = config.runtime.path.as_ref().map(|p| FixedRuntime(cwd.join(p)));
    let locator: &dyn RuntimeLocator = match &fixed {
        Some(fixed) => fixed,
        None => &PathLookup,
    };
    let stdlib = match RuntimeInstall::discover(locator, config.runtime_name()) {
        Ok(install) => Some(
            config
                .runtime
                .stdlib
                .as_ref()
                .map_or(install.stdlib, |s| cwd.join(s)),
        ),
        Err(e) => {
            tracing::warn!("{}; bare imports will not be checked against the standard library", e);
            None
        }
    };

    let opts = ResolveOptions {
        entry: args.entry,
        includes: args.include,
        stdlib,
    };
    let resolved = resolve(&opts, &cwd)?;
    let entries = resolved.manifest.entries();

    if args.json {
        let json: Vec<_> = entries
            .iter()
            .map(|e| JsonEntry {
                source: e.source.display().to_string(),
                archive_path: e.archive_name(),
                kind: e.kind,
            })
            .collect();
        let out = serde_json::to_string_pretty(&json).context("failed to serialize manifest")?;
        println!("{}", out);
        return Ok(());
    }

    for entry in entries {
        let kind = match entry.kind {
            EntryKind::Import => "import",
            EntryKind::Include => "include",
            EntryKind::Entry => "entry",
        };
        println!("{:<8} {}", kind, display_path(&cwd, &entry.source));
    }

    Ok(())
}
