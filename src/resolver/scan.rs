//! Import statement scanning.
//!
//! SPWN imports look like `import "path.spwn"`, `import ./path.spwn` or
//! `import libname`, and may appear inside expressions
//! (`let lib = import "lib.spwn"`). The scanner only finds them; it does not
//! check that the rest of the line is valid SPWN.

use regex::Regex;

/// Keyword that starts an import statement.
const IMPORT_KEYWORD: &str = "import";

/// One import statement found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReference {
    /// The statement text as matched, e.g. `import "./util.spwn"`.
    pub raw_match: String,
    /// Directory fragment before the target, e.g. `./` or `../shared/`.
    pub relative_prefix: Option<String>,
    /// File or library name.
    pub target_name: String,
}

impl ImportReference {
    /// True if the import names a path rather than a bare library.
    pub fn is_relative(&self) -> bool {
        self.relative_prefix.is_some()
    }
}

/// Finds import statements in source lines.
///
/// Each scanner owns its compiled pattern; there is no shared state.
#[derive(Debug, Clone)]
pub struct ImportScanner {
    statement: Regex,
}

impl ImportScanner {
    /// Create a scanner.
    pub fn new() -> Self {
        // Anchored at the keyword; the caller has already established that
        // the keyword is real code and not part of a string or comment.
        let statement = Regex::new(
            r#"^import\s*(?:["'])?(?P<relative>[^"'\s]*[\\/])?(?P<filename>[^"'\\/\s;,)]+)["']?"#,
        )
        .expect("import pattern is valid");

        ImportScanner { statement }
    }

    /// Scan one line for an import statement.
    ///
    /// `import` inside a string literal or after a `//` comment marker is
    /// ignored, as is `import` embedded in a longer identifier.
    pub fn scan_line(&self, line: &str) -> Option<ImportReference> {
        let bytes = line.as_bytes();
        let mut quote: Option<u8> = None;
        let mut escaped = false;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];

            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == q {
                    quote = None;
                }
                i += 1;
                continue;
            }

            match b {
                b'"' | b'\'' => quote = Some(b),
                b'/' if bytes.get(i + 1) == Some(&b'/') => return None,
                b'i' if self.is_keyword_at(line, i) => {
                    if let Some(reference) = self.match_statement(&line[i..]) {
                        return Some(reference);
                    }
                }
                _ => {}
            }
            i += 1;
        }

        None
    }

    /// Scan every line of a source file, in order.
    pub fn scan(&self, source: &str) -> Vec<ImportReference> {
        source.lines().filter_map(|l| self.scan_line(l)).collect()
    }

    fn is_keyword_at(&self, line: &str, i: usize) -> bool {
        if !line[i..].starts_with(IMPORT_KEYWORD) {
            return false;
        }
        let before = line[..i].chars().next_back();
        let after = line[i + IMPORT_KEYWORD.len()..].chars().next();

        let boundary_before = before.map_or(true, |c| !is_ident_char(c));
        let boundary_after =
            after.is_some_and(|c| c.is_whitespace() || c == '"' || c == '\'');
        boundary_before && boundary_after
    }

    fn match_statement(&self, rest: &str) -> Option<ImportReference> {
        let caps = self.statement.captures(rest)?;
        let whole = caps.get(0)?;

        Some(ImportReference {
            raw_match: whole.as_str().to_string(),
            relative_prefix: caps.name("relative").map(|m| m.as_str().to_string()),
            target_name: caps.name("filename")?.as_str().to_string(),
        })
    }
}

impl Default for ImportScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
