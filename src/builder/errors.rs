//! Build error types and diagnostics.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::footer::FooterError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Step of the artifact build, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    CopyWrapper,
    OpenOutput,
    AppendRuntime,
    CreateStaging,
    CopyStdlib,
    StageFile,
    Archive,
    AppendPayload,
    WriteFooter,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildStep::CopyWrapper => "copying the wrapper stub",
            BuildStep::OpenOutput => "opening the output file",
            BuildStep::AppendRuntime => "appending the runtime executable",
            BuildStep::CreateStaging => "creating the staging directory",
            BuildStep::CopyStdlib => "copying the standard library",
            BuildStep::StageFile => "staging a source file",
            BuildStep::Archive => "creating the payload archive",
            BuildStep::AppendPayload => "appending the payload archive",
            BuildStep::WriteFooter => "writing the artifact footer",
        };
        f.write_str(s)
    }
}

/// Error while building an artifact.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("could not find `{name}` on PATH")]
    RuntimeNotFound { name: String },

    #[error("runtime executable not found: {}", path.display())]
    MissingRuntime { path: PathBuf },

    #[error("wrapper stub not found: {}", path.display())]
    MissingWrapper { path: PathBuf },

    #[error("standard library directory not found: {}", path.display())]
    MissingStdlib { path: PathBuf },

    #[error("manifest has no entry file")]
    NoEntryFile,

    #[error("{step} failed: {}", path.display())]
    Io {
        step: BuildStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write payload archive")]
    Archive {
        #[source]
        source: zip::result::ZipError,
    },

    #[error(transparent)]
    Footer(#[from] FooterError),

    #[error("{} is incomplete and must not be used", path.display())]
    PartialOutput {
        path: PathBuf,
        #[source]
        source: Box<BuildError>,
    },
}

impl BuildError {
    /// Wrap an I/O error with the step and path it happened at.
    pub fn io(step: BuildStep, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> BuildError {
        let path = path.into();
        move |source| BuildError::Io { step, path, source }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BuildError::RuntimeNotFound { .. } | BuildError::MissingRuntime { .. } => {
                Diagnostic::error(self.to_string())
                    .with_suggestion(suggestions::RUNTIME_NOT_FOUND)
            }
            BuildError::MissingWrapper { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::MISSING_WRAPPER)
            }
            BuildError::MissingStdlib { .. } => Diagnostic::error(self.to_string())
                .with_suggestion("Set `runtime.stdlib` in .spwn-cmpl/config.toml"),
            BuildError::PartialOutput { path, source } => {
                let mut diag = source.to_diagnostic().with_context(format!(
                    "{} was left half-written and is not a valid executable",
                    path.display()
                ));
                diag.suggestions.push(suggestions::PARTIAL_OUTPUT.to_string());
                diag
            }
            BuildError::Io { source, .. } => {
                Diagnostic::error(self.to_string()).with_context(source.to_string())
            }
            BuildError::Archive { source } => {
                Diagnostic::error(self.to_string()).with_context(source.to_string())
            }
            BuildError::NoEntryFile | BuildError::Footer(_) => Diagnostic::error(self.to_string()),
        }
    }
}
