//! Content fingerprints for binary deduplication.

use std::collections::HashMap;

/// Checksum and length of a binary blob.
///
/// A fingerprint only narrows the search: two blobs are the same only when
/// their bytes compare equal, so colliding checksums never merge content.
/// The key holds no copy of the bytes; callers compare against wherever the
/// first blob was already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryHashKey {
    checksum: u32,
    len: usize,
}

impl BinaryHashKey {
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            checksum: crc32fast::hash(bytes),
            len: bytes.len(),
        }
    }

    /// Build a key with a given checksum, for exercising collisions.
    #[cfg(test)]
    pub(crate) fn with_checksum(checksum: u32, bytes: &[u8]) -> Self {
        Self {
            checksum,
            len: bytes.len(),
        }
    }

    #[must_use]
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Map from blob fingerprint to whatever was created for it.
///
/// Several values can share a fingerprint; [`BinaryHashMap::find`] picks the
/// one whose stored bytes really match.
#[derive(Debug, Clone)]
pub struct BinaryHashMap<V> {
    entries: HashMap<BinaryHashKey, Vec<V>>,
}

impl<V> Default for BinaryHashMap<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Copy> BinaryHashMap<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First value under `key` for which `same_bytes` confirms equal content.
    pub fn find(&self, key: &BinaryHashKey, mut same_bytes: impl FnMut(V) -> bool) -> Option<V> {
        self.entries
            .get(key)?
            .iter()
            .copied()
            .find(|&value| same_bytes(value))
    }

    pub fn insert(&mut self, key: BinaryHashKey, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
