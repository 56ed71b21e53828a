//! Artifact assembly.
//!
//! Writes `[wrapper][runtime][zip][footer]` to the output path. The wrapper
//! stub is copied first and everything else is appended to it, so a failure
//! after the copy leaves a partial file behind; such failures are reported as
//! [`BuildError::PartialOutput`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::builder::archive;
use crate::builder::errors::{BuildError, BuildStep};
use crate::builder::runtime::RuntimeInstall;
use crate::builder::staging::StagingDir;
use crate::core::footer::{ArtifactFooter, DEFAULT_SUBCOMMAND};
use crate::core::PackageManifest;

/// Scratch name of the zip inside the staging root (outside `data/`).
const PAYLOAD_FILE: &str = "payload.zip";

/// Summary of a finished build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub output: PathBuf,
    pub command: String,
    pub wrapper_size: u64,
    pub runtime_size: u64,
    pub payload_size: u64,
    pub footer_size: u64,
    pub total_size: u64,
    /// Manifest files staged into the payload.
    pub files: usize,
    /// Standard library files staged into the payload.
    pub stdlib_files: usize,
}

/// Assembles artifacts from a manifest.
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    runtime: RuntimeInstall,
    wrapper: PathBuf,
    subcommand: String,
    pass_through: Option<String>,
    progress: bool,
}

impl PackageBuilder {
    /// Create a builder for a runtime install and a wrapper stub.
    pub fn new(runtime: RuntimeInstall, wrapper: impl Into<PathBuf>) -> Self {
        PackageBuilder {
            runtime,
            wrapper: wrapper.into(),
            subcommand: DEFAULT_SUBCOMMAND.to_string(),
            pass_through: None,
            progress: false,
        }
    }

    /// Runtime subcommand written into the footer.
    pub fn subcommand(mut self, subcommand: impl Into<String>) -> Self {
        self.subcommand = subcommand.into();
        self
    }

    /// Extra arguments appended to the runtime command line.
    pub fn pass_through(mut self, args: Option<String>) -> Self {
        self.pass_through = args;
        self
    }

    /// Show a progress bar while staging files.
    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Write the artifact for `manifest` to `output`.
    pub fn build(&self, manifest: &PackageManifest, output: &Path) -> Result<BuildReport, BuildError> {
        let entry = manifest.entry().ok_or(BuildError::NoEntryFile)?;
        let command = ArtifactFooter::command_line(
            &self.subcommand,
            &entry.archive_name(),
            self.pass_through.as_deref(),
        )?;

        if !self.wrapper.is_file() {
            return Err(BuildError::MissingWrapper {
                path: self.wrapper.clone(),
            });
        }
        self.runtime.validate()?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(BuildError::io(BuildStep::OpenOutput, parent))?;
        }
        let wrapper_size = fs::copy(&self.wrapper, output)
            .map_err(BuildError::io(BuildStep::CopyWrapper, &self.wrapper))?;
        tracing::debug!("Copied wrapper stub ({} bytes)", wrapper_size);

        self.append(manifest, output, command, wrapper_size)
            .map_err(|e| BuildError::PartialOutput {
                path: output.to_path_buf(),
                source: Box::new(e),
            })
    }

    fn append(
        &self,
        manifest: &PackageManifest,
        output: &Path,
        command: String,
        wrapper_size: u64,
    ) -> Result<BuildReport, BuildError> {
        let file = OpenOptions::new()
            .append(true)
            .open(output)
            .map_err(BuildError::io(BuildStep::OpenOutput, output))?;
        let mut out = BufWriter::new(file);

        let runtime_size = append_file(&mut out, &self.runtime.exe, BuildStep::AppendRuntime)?;
        tracing::debug!("Appended runtime ({} bytes)", runtime_size);

        let staging = StagingDir::new()?;
        let stdlib_files = staging.copy_stdlib(&self.runtime.stdlib)?;
        tracing::debug!("Copied {} standard library files", stdlib_files);

        let pb = self.progress_bar(manifest.file_count());
        for entry in manifest.entries() {
            if let Some(pb) = &pb {
                pb.set_message(entry.archive_name());
            }
            staging.stage(entry)?;
            tracing::debug!("Staged {}", entry.archive_name());
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let zip_path = staging.root().join(PAYLOAD_FILE);
        let zip_file =
            File::create(&zip_path).map_err(BuildError::io(BuildStep::Archive, &zip_path))?;
        let (zip_file, _) = archive::write_dir(staging.data_dir(), zip_file)
            .map_err(|source| BuildError::Archive { source })?;
        drop(zip_file);

        let payload_size = append_file(&mut out, &zip_path, BuildStep::AppendPayload)?;
        tracing::debug!("Appended payload ({} bytes)", payload_size);

        let footer = ArtifactFooter::new(command, payload_size, runtime_size)?;
        out.write_all(&footer.encode())
            .and_then(|_| out.flush())
            .map_err(BuildError::io(BuildStep::WriteFooter, output))?;
        drop(out);

        staging.close();

        let total_size = fs::metadata(output)
            .map_err(BuildError::io(BuildStep::WriteFooter, output))?
            .len();

        Ok(BuildReport {
            output: output.to_path_buf(),
            command: footer.command.clone(),
            wrapper_size,
            runtime_size,
            payload_size,
            footer_size: footer.encoded_len(),
            total_size,
            files: manifest.file_count(),
            stdlib_files,
        })
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.progress || total <= 1 {
            return None;
        }
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    }
}

fn append_file<W: Write>(out: &mut W, path: &Path, step: BuildStep) -> Result<u64, BuildError> {
    let mut src = File::open(path).map_err(BuildError::io(step, path))?;
    io::copy(&mut src, out).map_err(BuildError::io(step, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::runtime::FixedRuntime;
    use crate::core::PackageManifest;
    use crate::test_support::{ProjectFixture, RuntimeFixture, WrittenRuntime};
    use std::io::Cursor;

    fn install(runtime: &WrittenRuntime) -> RuntimeInstall {
        RuntimeInstall::discover(&FixedRuntime(runtime.exe.clone()), "spwn").unwrap()
    }

    #[test]
    fn test_artifact_layout() {
        let fixture = RuntimeFixture::new();
        let runtime = fixture.write();
        let project = ProjectFixture::new()
            .file("main.spwn", "import ./a.spwn\n")
            .file("a.spwn", "$.print(1)\n")
            .write();

        let manifest =
            PackageManifest::compose(&project.path("main.spwn"), &[project.path("a.spwn")], &[])
                .unwrap();
        let out = project.path("bin/linux");

        let report = PackageBuilder::new(install(&runtime), &runtime.wrapper)
            .pass_through(Some("--live-editor".to_string()))
            .build(&manifest, &out)
            .unwrap();

        let bytes = fs::read(&out).unwrap();
        assert_eq!(report.total_size, bytes.len() as u64);
        assert_eq!(
            report.total_size,
            report.wrapper_size + report.runtime_size + report.payload_size + report.footer_size
        );
        assert_eq!(report.command, "b main.spwn --live-editor");

        let (footer, layout) = ArtifactFooter::read_from(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(footer.runtime_size, fixture.runtime_bytes.len() as u64);
        assert_eq!(footer.payload_size, report.payload_size);

        let range = |r: std::ops::Range<u64>| &bytes[r.start as usize..r.end as usize];
        assert_eq!(range(layout.wrapper), &fixture.wrapper_bytes[..]);
        assert_eq!(range(layout.runtime.clone()), &fixture.runtime_bytes[..]);

        let names = archive::list_files(Cursor::new(range(layout.payload))).unwrap();
        assert_eq!(
            names,
            vec![
                "a.spwn",
                "libraries/std/lib.spwn",
                "libraries/std/util.spwn",
                "main.spwn"
            ]
        );
    }

    #[test]
    fn test_missing_wrapper_creates_nothing() {
        let runtime = RuntimeFixture::new().write();
        let project = ProjectFixture::new().file("main.spwn", "").write();
        let manifest = PackageManifest::compose(&project.path("main.spwn"), &[], &[]).unwrap();
        let out = project.path("bin/linux");

        let err = PackageBuilder::new(install(&runtime), project.path("containers/nope"))
            .build(&manifest, &out)
            .unwrap_err();

        assert!(matches!(err, BuildError::MissingWrapper { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_nul_in_arguments_rejected_before_writing() {
        let runtime = RuntimeFixture::new().write();
        let project = ProjectFixture::new().file("main.spwn", "").write();
        let manifest = PackageManifest::compose(&project.path("main.spwn"), &[], &[]).unwrap();
        let out = project.path("bin/linux");

        let err = PackageBuilder::new(install(&runtime), &runtime.wrapper)
            .pass_through(Some("--a\0b".to_string()))
            .build(&manifest, &out)
            .unwrap_err();

        assert!(matches!(err, BuildError::Footer(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_failure_after_wrapper_is_partial_output() {
        let runtime = RuntimeFixture::new().write();
        let project = ProjectFixture::new().file("main.spwn", "").write();
        let manifest = PackageManifest::compose(&project.path("main.spwn"), &[], &[]).unwrap();
        let out = project.path("bin/linux");

        // Remove the entry file after composing so staging fails.
        fs::remove_file(project.path("main.spwn")).unwrap();

        let err = PackageBuilder::new(install(&runtime), &runtime.wrapper)
            .build(&manifest, &out)
            .unwrap_err();

        match err {
            BuildError::PartialOutput { path, source } => {
                assert_eq!(path, out);
                assert!(matches!(
                    *source,
                    BuildError::Io {
                        step: BuildStep::StageFile,
                        ..
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(out.exists());
    }
}
