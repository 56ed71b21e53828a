//! Zip payload creation and extraction.
//!
//! The archive root is always passed explicitly; nothing here touches the
//! process working directory.

use std::fs::{self, File};
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::core::manifest::archive_name;

/// Zip every file below `root`, with entry names relative to `root`.
///
/// Entries are written in sorted order so the same tree always produces the
/// same archive. Returns the writer and the number of files written.
pub fn write_dir<W: Write + Seek>(root: &Path, writer: W) -> Result<(W, usize), ZipError> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut files = 0;

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let name = archive_name(rel);

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name, options)?;
            let mut f = File::open(entry.path())?;
            io::copy(&mut f, &mut zip)?;
            files += 1;
        }
    }

    Ok((zip.finish()?, files))
}

/// List the file entries of an archive.
pub fn list_files<R: Read + Seek>(reader: R) -> Result<Vec<String>, ZipError> {
    let mut archive = ZipArchive::new(reader)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        if !entry.is_dir() {
            names.push(entry.name().to_owned());
        }
    }
    Ok(names)
}

/// Extract an archive below `dest`, returning the files written.
///
/// Entries whose names would escape `dest` are skipped.
pub fn extract<R: Read + Seek>(reader: R, dest: &Path) -> Result<Vec<PathBuf>, ZipError> {
    let mut archive = ZipArchive::new(reader)?;
    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(rel) = entry.enclosed_name() else {
            tracing::warn!("Skipping unsafe archive entry `{}`", entry.name());
            continue;
        };
        let out = dest.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&out)?;
        } else {
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = File::create(&out)?;
            io::copy(&mut entry, &mut file)?;
            written.push(out);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_names_relative_to_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("data");
        fs::create_dir_all(root.join("libraries/std")).unwrap();
        fs::write(root.join("libraries/std/lib.spwn"), "std").unwrap();
        fs::write(root.join("main.spwn"), "main").unwrap();

        let (cursor, files) = write_dir(&root, Cursor::new(Vec::new())).unwrap();
        assert_eq!(files, 2);

        let names = list_files(Cursor::new(cursor.into_inner())).unwrap();
        assert_eq!(names, vec!["libraries/std/lib.spwn", "main.spwn"]);
    }

    #[test]
    fn test_extract() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("data");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.spwn"), "$.print(1)").unwrap();

        let (cursor, _) = write_dir(&root, Cursor::new(Vec::new())).unwrap();
        let dest = tmp.path().join("out");
        let written = extract(Cursor::new(cursor.into_inner()), &dest).unwrap();

        assert_eq!(written, vec![dest.join("src/main.spwn")]);
        assert_eq!(
            fs::read_to_string(dest.join("src/main.spwn")).unwrap(),
            "$.print(1)"
        );
    }

    #[test]
    fn test_deterministic_output() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("data");
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("b/x.spwn"), "x").unwrap();
        fs::write(root.join("a.spwn"), "a").unwrap();

        let (first, _) = write_dir(&root, Cursor::new(Vec::new())).unwrap();
        let (second, _) = write_dir(&root, Cursor::new(Vec::new())).unwrap();
        assert_eq!(first.into_inner(), second.into_inner());
    }
}
