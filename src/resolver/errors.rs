//! Resolution error types and diagnostics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during import resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("source file not found: {}", path.display())]
    MissingSourceFile {
        path: PathBuf,
        /// File whose import statement pointed here (`None` for the entry file)
        imported_from: Option<PathBuf>,
        /// The import statement as written
        statement: Option<String>,
    },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::MissingSourceFile {
                path,
                imported_from: None,
                ..
            } => Diagnostic::error("could not find entry file")
                .with_location(path)
                .with_suggestion("Check the path passed to `--entry`"),

            ResolveError::MissingSourceFile {
                path,
                imported_from: Some(from),
                statement,
            } => {
                let mut diag = Diagnostic::error("could not find imported file")
                    .with_location(path)
                    .with_context(format!("imported from {}", from.display()));

                if let Some(statement) = statement {
                    diag = diag.with_context(format!("by `{}`", statement));
                }

                let is_library = path.file_name().is_some_and(|n| n == "lib.spwn");
                if is_library {
                    diag = diag.with_suggestion(suggestions::MISSING_LIBRARY);
                }
                diag.with_suggestion("Check that the import path is spelled correctly")
            }

            ResolveError::Read { path, source } => {
                Diagnostic::error(format!("failed to read source file: {}", source))
                    .with_location(path)
            }
        }
    }
}
