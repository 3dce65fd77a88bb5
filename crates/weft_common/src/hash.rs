//! Content hashing for identifier shortening.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit content hash computed using XXH3.
///
/// Two inputs with the same `ContentHash` are assumed to be identical. The
/// compiler only ever uses a short hex prefix of it, see [`ContentHash::short_hex`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_be_bytes())
    }

    /// Computes a content hash of a string's UTF-8 bytes.
    pub fn from_text(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }

    /// Returns the first `width` lowercase hex characters of the hash.
    ///
    /// `width` is clamped to the 32 characters a 128-bit hash provides.
    pub fn short_hex(&self, width: usize) -> String {
        let mut hex = self.to_string();
        hex.truncate(width);
        hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
