//! Hashing utilities for payload checksums.

use std::io::Read;

use anyhow::Result;
use sha2::{Digest, Sha256};

/// Compute SHA256 hash of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute SHA256 hash of everything a reader yields.
///
/// Pair with [`Read::take`] to hash one segment of an artifact.
pub fn sha256_reader<R: Read>(mut reader: R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_bytes() {
        assert_eq!(
            sha256_bytes(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_reader_matches_bytes() {
        let data = b"\0b main.spwn\x00120";
        assert_eq!(sha256_reader(&data[..]).unwrap(), sha256_bytes(data));
        assert_eq!(
            sha256_reader((&data[..]).take(3)).unwrap(),
            sha256_bytes(&data[..3])
        );
    }
}
