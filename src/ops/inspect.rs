//! Implementation of `spwn-cmpl inspect`.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::builder::archive;
use crate::core::ArtifactFooter;
use crate::util::hash::{sha256_bytes, sha256_reader};

/// Everything `inspect` reports about an artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    pub total_size: u64,
    pub command: String,
    pub wrapper_size: u64,
    pub runtime_size: u64,
    pub payload_size: u64,
    pub footer_size: u64,
    pub runtime_sha256: String,
    pub payload_sha256: String,
    pub files: Vec<String>,
}

/// Read the footer and payload listing of a built artifact.
pub fn inspect(path: &Path) -> Result<ArtifactInfo> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let (footer, layout) = ArtifactFooter::read_from(&mut file)
        .with_context(|| format!("{} is not a spwn-cmpl artifact", path.display()))?;

    file.seek(SeekFrom::Start(layout.runtime.start))?;
    let runtime_sha256 = sha256_reader((&mut file).take(len(&layout.runtime)))
        .context("failed to hash embedded runtime")?;
    let payload = read_range(&mut file, &layout.payload)?;

    let files = archive::list_files(Cursor::new(&payload))
        .with_context(|| format!("payload of {} is not a valid zip archive", path.display()))?;

    Ok(ArtifactInfo {
        path: path.to_path_buf(),
        total_size: layout.footer.end,
        command: footer.command,
        wrapper_size: len(&layout.wrapper),
        runtime_size: len(&layout.runtime),
        payload_size: len(&layout.payload),
        footer_size: len(&layout.footer),
        runtime_sha256,
        payload_sha256: sha256_bytes(&payload),
        files,
    })
}

/// Read one section of an artifact into memory.
pub(crate) fn read_range<R: Read + Seek>(
    reader: &mut R,
    range: &std::ops::Range<u64>,
) -> Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(range.start))?;
    let mut buf = Vec::with_capacity(len(range) as usize);
    reader
        .take(len(range))
        .read_to_end(&mut buf)
        .context("failed to read artifact section")?;
    Ok(buf)
}

fn len(range: &std::ops::Range<u64>) -> u64 {
    range.end - range.start
}
