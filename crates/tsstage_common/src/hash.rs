//! Content hashing for change detection between build cycles.

use std::fmt;

/// The XXH3-128 digest of a file's bytes.
///
/// Used purely to notice accidental change between two build cycles. Two
/// inputs with the same `ContentHash` are assumed to have identical content;
/// no resistance against deliberate collisions is implied.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(u128);

impl ContentHash {
    /// Hashes `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data))
    }
}

/// Full 32-digit lowercase hex.
impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// The leading 8 hex digits, enough to tell hashes apart in logs.
impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:08x}..)", self.0 >> 96)
    }
}
