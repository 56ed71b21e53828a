//! Filesystem utilities.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use walkdir::WalkDir;

/// Expand `--include` arguments relative to `base`.
///
/// Glob patterns expand to the files they match, directories expand to
/// every file below them. Anything else is passed through untouched so a
/// missing file is reported later with the path the user typed.
pub fn expand_includes(base: &Path, patterns: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for pattern in patterns {
        let full = base.join(pattern);

        if full.is_dir() {
            let mut files = Vec::new();
            for entry in WalkDir::new(&full).follow_links(true) {
                let entry = entry.map_err(|e| {
                    let path = e.path().unwrap_or(&full).display().to_string();
                    anyhow::Error::new(e).context(format!("failed to read {}", path))
                })?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
            files.sort();
            results.extend(files);
            continue;
        }

        let pattern_str = full.to_string_lossy();
        if !pattern_str.contains(['*', '?', '[']) {
            results.push(full);
            continue;
        }

        let mut matched = Vec::new();
        for entry in glob(&pattern_str)
            .with_context(|| format!("invalid glob pattern: {}", pattern.display()))?
        {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        matched.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
        if matched.is_empty() {
            tracing::warn!("include pattern `{}` matched no files", pattern.display());
        }
        matched.sort();
        results.extend(matched);
    }

    Ok(results)
}

/// Deepest directory that contains every path in `paths`.
pub fn common_ancestor<'a, I>(paths: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut iter = paths.into_iter();
    let mut common = iter.next()?.to_path_buf();

    for path in iter {
        while !path.starts_with(&common) {
            if !common.pop() {
                return None;
            }
        }
    }

    Some(common)
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expand_includes() {
        let tmp = TempDir::new().unwrap();
        let assets = tmp.path().join("assets");
        fs::create_dir_all(assets.join("nested")).unwrap();
        fs::write(assets.join("a.txt"), "a").unwrap();
        fs::write(assets.join("nested/b.txt"), "b").unwrap();
        fs::write(tmp.path().join("x.spwn"), "").unwrap();
        fs::write(tmp.path().join("y.spwn"), "").unwrap();

        let dir = expand_includes(tmp.path(), &[PathBuf::from("assets")]).unwrap();
        assert_eq!(dir.len(), 2);

        let globbed = expand_includes(tmp.path(), &[PathBuf::from("*.spwn")]).unwrap();
        assert_eq!(
            globbed,
            vec![tmp.path().join("x.spwn"), tmp.path().join("y.spwn")]
        );

        let literal = expand_includes(tmp.path(), &[PathBuf::from("missing.txt")]).unwrap();
        assert_eq!(literal, vec![tmp.path().join("missing.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_include_dir_follows_symlinks() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let shared = tmp.path().join("shared");
        fs::create_dir_all(shared.join("sprites")).unwrap();
        fs::write(shared.join("sprites/hero.png"), "png").unwrap();
        fs::write(shared.join("notes.txt"), "notes").unwrap();
        fs::create_dir(tmp.path().join("assets")).unwrap();
        symlink(shared.join("sprites"), tmp.path().join("assets/sprites")).unwrap();
        symlink(shared.join("notes.txt"), tmp.path().join("assets/notes.txt")).unwrap();

        let files = expand_includes(tmp.path(), &[PathBuf::from("assets")]).unwrap();
        assert_eq!(
            files,
            vec![
                tmp.path().join("assets/notes.txt"),
                tmp.path().join("assets/sprites/hero.png"),
            ]
        );

        symlink(tmp.path().join("gone"), tmp.path().join("assets/broken")).unwrap();
        let err = expand_includes(tmp.path(), &[PathBuf::from("assets")]).unwrap_err();
        assert!(err.to_string().contains("assets/broken"));
    }

    #[test]
    fn test_common_ancestor() {
        let paths = [
            Path::new("/proj/src"),
            Path::new("/proj/src/nested"),
            Path::new("/proj/libraries/b"),
        ];
        assert_eq!(
            common_ancestor(paths.iter().copied()),
            Some(PathBuf::from("/proj"))
        );
        assert_eq!(common_ancestor(std::iter::empty::<&Path>()), None);
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/proj"), Path::new("/proj/src/main.spwn")),
            PathBuf::from("src/main.spwn")
        );
    }
}
