//! Content-addressed hashes for output file names.

use serde::Serialize;

use crate::error::{Error, Result};

pub const DEFAULT_HASH_LENGTH: usize = 8;
pub const MIN_HASH_LENGTH: usize = 4;
/// Length of a full BLAKE3 digest in hex.
pub const MAX_HASH_LENGTH: usize = 64;

/// Truncated lowercase-hex BLAKE3 digest of a file's bytes.
///
/// The same bytes always produce the same hash; any change to the bytes
/// changes it. Nothing else (time, path, build order) feeds into it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash `content`, keeping the first `length` hex characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HashLength`] if `length` is outside 4..=64.
    pub fn compute(content: &[u8], length: usize) -> Result<Self> {
        check_hash_length(length)?;
        Ok(Self::compute_truncated(content, length))
    }

    pub(crate) fn compute_truncated(content: &[u8], length: usize) -> Self {
        let digest = blake3::hash(content);
        let mut hex = digest.to_hex().to_string();
        hex.truncate(length.clamp(MIN_HASH_LENGTH, MAX_HASH_LENGTH));
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn check_hash_length(length: usize) -> Result<()> {
    if (MIN_HASH_LENGTH..=MAX_HASH_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(Error::HashLength(length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_for_same_content() {
        let a = ContentHash::compute(b"export default 1;", 8).unwrap();
        let b = ContentHash::compute(b"export default 1;", 8).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 8);
    }

    #[test]
    fn hash_changes_with_content() {
        let a = ContentHash::compute(b"export default 1;", 8).unwrap();
        let b = ContentHash::compute(b"export default 2;", 8).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_lowercase_hex_prefix_of_full_digest() {
        let full = ContentHash::compute(b"body{}", MAX_HASH_LENGTH).unwrap();
        let short = ContentHash::compute(b"body{}", 12).unwrap();
        assert!(full.as_str().starts_with(short.as_str()));
        assert!(full
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn hash_length_bounds() {
        assert_eq!(ContentHash::compute(b"x", 3), Err(Error::HashLength(3)));
        assert_eq!(ContentHash::compute(b"x", 65), Err(Error::HashLength(65)));
        assert!(ContentHash::compute(b"x", 4).is_ok());
        assert!(ContentHash::compute(b"", 64).is_ok());
    }
}
