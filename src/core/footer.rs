//! The trailing metadata block of a built artifact.
//!
//! An artifact is laid out as
//!
//! ```text
//! [wrapper][runtime][zip]\0<command>\0<zip-size>\0<runtime-size>
//! ```
//!
//! The wrapper stub reads it from the end of its own file backward: the last
//! field is the runtime size, then the zip size, then the command string. The
//! sizes are decimal ASCII. Nothing in the footer may contain a NUL byte, or
//! the backward split lands in the wrong place.

use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Range;

use thiserror::Error;

/// Field separator.
pub const DELIMITER: u8 = 0;

/// Runtime subcommand the wrapper invokes (`spwn b <file>`).
pub const DEFAULT_SUBCOMMAND: &str = "b";

/// First window [`ArtifactFooter::read_from`] reads from the end; doubled
/// until it holds the whole footer.
const FOOTER_CHUNK: u64 = 4 * 1024;

/// Error encoding or decoding a footer.
#[derive(Debug, Error)]
pub enum FooterError {
    #[error("{field} contains a NUL byte, which would corrupt the artifact footer")]
    NulByte { field: &'static str },

    #[error("artifact footer is truncated (expected 3 NUL-delimited fields)")]
    Truncated,

    #[error("invalid {field} in artifact footer: `{value}`")]
    InvalidSize { field: &'static str, value: String },

    #[error("footer declares {declared} bytes of payload but only {available} bytes precede it")]
    SizeOutOfRange { declared: u64, available: u64 },

    #[error("command in artifact footer is not valid UTF-8")]
    InvalidCommand,

    #[error("failed to read artifact: {0}")]
    Io(#[from] io::Error),
}

/// Decoded footer fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFooter {
    /// Command line handed to the runtime after extraction.
    pub command: String,
    /// Size of the zip payload in bytes.
    pub payload_size: u64,
    /// Size of the embedded runtime executable in bytes.
    pub runtime_size: u64,
}

impl ArtifactFooter {
    /// Create a footer, rejecting commands that contain NUL.
    pub fn new(
        command: impl Into<String>,
        payload_size: u64,
        runtime_size: u64,
    ) -> Result<Self, FooterError> {
        let command = command.into();
        ensure_no_nul("command", &command)?;
        Ok(ArtifactFooter {
            command,
            payload_size,
            runtime_size,
        })
    }

    /// Compose the runtime command line: `<subcommand> <entry>[ <args>]`.
    pub fn command_line(
        subcommand: &str,
        entry: &str,
        pass_through: Option<&str>,
    ) -> Result<String, FooterError> {
        ensure_no_nul("subcommand", subcommand)?;
        ensure_no_nul("entry path", entry)?;

        let mut line = format!("{} {}", subcommand, entry);
        if let Some(args) = pass_through.map(str::trim).filter(|a| !a.is_empty()) {
            ensure_no_nul("pass-through arguments", args)?;
            line.push(' ');
            line.push_str(args);
        }
        Ok(line)
    }

    /// Serialize to the on-disk byte layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.command.len() + 24);
        out.push(DELIMITER);
        out.extend_from_slice(self.command.as_bytes());
        out.push(DELIMITER);
        out.extend_from_slice(self.payload_size.to_string().as_bytes());
        out.push(DELIMITER);
        out.extend_from_slice(self.runtime_size.to_string().as_bytes());
        out
    }

    /// Length of [`encode`](Self::encode) output.
    pub fn encoded_len(&self) -> u64 {
        (3 + self.command.len()
            + self.payload_size.to_string().len()
            + self.runtime_size.to_string().len()) as u64
    }

    /// Decode a footer from the tail of an artifact.
    ///
    /// `tail` must end where the artifact ends and must include the NUL that
    /// precedes the command string. Leading bytes are ignored.
    pub fn decode(tail: &[u8]) -> Result<Self, FooterError> {
        Self::decode_tail(tail).map(|(footer, _)| footer)
    }

    /// Decode, also returning the footer's length as found on disk.
    fn decode_tail(tail: &[u8]) -> Result<(Self, u64), FooterError> {
        let mut fields = tail.rsplitn(4, |b| *b == DELIMITER);

        let runtime = fields.next().ok_or(FooterError::Truncated)?;
        let payload = fields.next().ok_or(FooterError::Truncated)?;
        let command = fields.next().ok_or(FooterError::Truncated)?;
        // The NUL before the command must be present, otherwise the command
        // may have been cut short.
        let preceding = fields.next().ok_or(FooterError::Truncated)?;

        let command = std::str::from_utf8(command)
            .map_err(|_| FooterError::InvalidCommand)?
            .to_string();

        let footer = ArtifactFooter {
            command,
            payload_size: parse_size("payload size", payload)?,
            runtime_size: parse_size("runtime size", runtime)?,
        };
        Ok((footer, (tail.len() - preceding.len()) as u64))
    }

    /// Read the footer from a seekable artifact and compute segment offsets.
    ///
    /// Reads backward from the end in growing windows until the three
    /// footer delimiters are in view, so the command may be any length.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<(Self, ArtifactLayout), FooterError> {
        let total = reader.seek(SeekFrom::End(0))?;
        let mut window = total.min(FOOTER_CHUNK);

        let tail = loop {
            reader.seek(SeekFrom::Start(total - window))?;
            let mut tail = Vec::with_capacity(window as usize);
            (&mut *reader).take(window).read_to_end(&mut tail)?;

            let delimiters = tail.iter().filter(|b| **b == DELIMITER).count();
            if delimiters >= 3 || window == total {
                break tail;
            }
            window = total.min(window.saturating_mul(2));
        };

        let (footer, footer_len) = Self::decode_tail(&tail)?;
        let layout = ArtifactLayout::compute(total, footer_len, &footer)?;
        Ok((footer, layout))
    }
}

/// Byte ranges of each artifact segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub wrapper: Range<u64>,
    pub runtime: Range<u64>,
    pub payload: Range<u64>,
    pub footer: Range<u64>,
}

impl ArtifactLayout {
    /// Work out segment ranges by subtracting from the end of the file.
    ///
    /// `footer_len` is the footer's length as stored, which can differ from
    /// [`ArtifactFooter::encoded_len`] when a writer padded the sizes.
    pub fn compute(
        total_len: u64,
        footer_len: u64,
        footer: &ArtifactFooter,
    ) -> Result<Self, FooterError> {
        let available = total_len.saturating_sub(footer_len);
        let declared = footer
            .payload_size
            .checked_add(footer.runtime_size)
            .ok_or(FooterError::SizeOutOfRange {
                declared: u64::MAX,
                available,
            })?;

        if footer_len > total_len || declared > available {
            return Err(FooterError::SizeOutOfRange {
                declared,
                available,
            });
        }

        let payload_start = available - footer.payload_size;
        let runtime_start = payload_start - footer.runtime_size;

        Ok(ArtifactLayout {
            wrapper: 0..runtime_start,
            runtime: runtime_start..payload_start,
            payload: payload_start..available,
            footer: available..total_len,
        })
    }
}

fn ensure_no_nul(field: &'static str, value: &str) -> Result<(), FooterError> {
    if value.as_bytes().contains(&DELIMITER) {
        return Err(FooterError::NulByte { field });
    }
    Ok(())
}

fn parse_size(field: &'static str, raw: &[u8]) -> Result<u64, FooterError> {
    let text = String::from_utf8_lossy(raw);
    text.parse::<u64>().map_err(|_| FooterError::InvalidSize {
        field,
        value: text.into_owned(),
    })
}
