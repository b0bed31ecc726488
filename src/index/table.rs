//! VersionedIndex implementation
//!
//! BTreeMap-based multi-version index. No interior locking; the owner
//! serializes all access.

use std::collections::BTreeMap;
use std::ops::Bound;

use super::VersionedEntry;

/// Ordered set of all versions of all keys
///
/// Entries are totally ordered by `(key ASC, version ASC)`. At most one
/// entry exists per `(key, version)` pair; distinct versions of the same
/// key coexist and are never merged.
#[derive(Debug, Clone, Default)]
pub struct VersionedIndex {
    entries: BTreeMap<(String, i64), String>,
}

impl VersionedIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build an index from a sequence of entries (snapshot restore path)
    pub fn from_entries(entries: impl IntoIterator<Item = VersionedEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.upsert(entry);
        }
        index
    }

    /// Insert an entry, replacing any existing entry with the same
    /// `(key, version)` pair (last writer for that exact version wins)
    pub fn upsert(&mut self, entry: VersionedEntry) {
        self.entries.insert((entry.key, entry.version), entry.value);
    }

    /// Point lookup pivoting on `(key, version)`
    ///
    /// Scans in ascending `(key, version)` order starting from the pivot and
    /// returns the first entry whose key equals the query key — the entry
    /// with the smallest stored version that is >= the queried version.
    /// A write is therefore visible only to lookups whose queried version is
    /// <= the write's version. If the first entry at or after the pivot
    /// belongs to a different key, or the index is exhausted, the lookup
    /// misses.
    pub fn lookup(&self, key: &str, version: i64) -> Option<VersionedEntry> {
        let pivot = (key.to_string(), version);
        let ((found_key, found_version), value) = self
            .entries
            .range((Bound::Included(pivot), Bound::Unbounded))
            .next()?;

        if found_key != key {
            return None;
        }

        Some(VersionedEntry {
            key: found_key.clone(),
            value: value.clone(),
            version: *found_version,
        })
    }

    /// Take an independent point-in-time copy for snapshotting
    ///
    /// BTreeMap has no cheap structural sharing, so this is a full copy,
    /// taken synchronously inside the owner's turn. The copy never observes
    /// later mutations of the live index.
    pub fn snapshot_copy(&self) -> VersionedIndex {
        self.clone()
    }

    /// Lazy traversal of all entries in `(key ASC, version ASC)` order
    pub fn ascend(&self) -> impl Iterator<Item = VersionedEntry> + '_ {
        self.entries
            .iter()
            .map(|((key, version), value)| VersionedEntry {
                key: key.clone(),
                value: value.clone(),
                version: *version,
            })
    }

    /// Consume the index into an ordered vector of entries
    pub fn into_entries(self) -> Vec<VersionedEntry> {
        self.entries
            .into_iter()
            .map(|((key, version), value)| VersionedEntry {
                key,
                value,
                version,
            })
            .collect()
    }

    /// Number of stored entries (all versions of all keys)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
