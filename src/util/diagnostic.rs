//! User-friendly diagnostic messages.
//!
//! Every error shown to the user names the offending path and, where there
//! is one, a concrete way to fix it.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the runtime is not on PATH.
    pub const RUNTIME_NOT_FOUND: &str =
        "Install SPWN and make sure `spwn` is on your PATH, or pass `--runtime <path>`";

    /// Suggestion when a library import cannot be found.
    pub const MISSING_LIBRARY: &str =
        "Place the library at `libraries/<name>/lib.spwn` next to the importing file";

    /// Suggestion when the wrapper stub is missing.
    pub const MISSING_WRAPPER: &str =
        "Pass `--wrapper <path>` or set `build.containers_dir` in .spwn-cmpl/config.toml";

    /// Suggestion when an artifact was left half-written.
    pub const PARTIAL_OUTPUT: &str = "Delete the output file and run the build again";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (color, self.severity) {
            (true, Severity::Error) => "\x1b[1;31merror\x1b[0m".to_string(),
            (false, severity) => severity.to_string(),
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("could not find imported file")
            .with_location("/proj/libraries/b/lib.spwn")
            .with_context("imported from /proj/a.spwn")
            .with_suggestion(suggestions::MISSING_LIBRARY);

        let output = diag.format(false);
        assert!(output.starts_with("error: could not find imported file"));
        assert!(output.contains("--> /proj/libraries/b/lib.spwn"));
        assert!(output.contains("= imported from /proj/a.spwn"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Place the library"));
    }

    #[test]
    fn test_color_wraps_severity() {
        let diag = Diagnostic::error("artifact was only partially written");
        assert!(diag.format(true).starts_with("\x1b[1;31merror\x1b[0m: artifact"));
        assert_eq!(diag.severity, Severity::Error);
    }
}
