//! Snapshot persistence
//!
//! Durable write and read-back of index contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::error::{EpochError, Result};
use crate::index::{VersionedEntry, VersionedIndex};

/// On-disk shape of one snapshot file
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotPayload {
    entries: Vec<VersionedEntry>,
}

/// Writes and reads snapshot files in one directory
///
/// Writes are handed off to background threads and are best-effort: a
/// failed snapshot is logged and skipped, never propagated, since the live
/// index is untouched and the next interval will try again. Reads surface
/// typed errors so startup can tell "first run" from "misconfiguration."
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    const FILE_PREFIX: &'static str = "state_";
    const FILE_SUFFIX: &'static str = ".json";

    /// Create a snapshot store over the given directory
    ///
    /// Creates the directory if it does not exist.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Serialize `entries` to `state_<tag>.json`, synchronously
    ///
    /// `tag` is the wall-clock second at which the snapshot was scheduled,
    /// supplied by the caller — not the write-completion time. Two writes
    /// sharing a tag land on the same file, last write wins.
    pub fn write(&self, entries: &[VersionedEntry], tag: i64) -> Result<PathBuf> {
        let payload = SnapshotPayload {
            entries: entries.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&payload)?;

        let path = self.snapshot_path(tag);
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Hand `entries` to a background thread for writing
    ///
    /// Never blocks the caller beyond the hand-off. Failures are logged and
    /// swallowed: durability is best-effort within the snapshot interval,
    /// and a failed write must never crash the process or stall the actor.
    pub fn spawn_write(&self, entries: Vec<VersionedEntry>, tag: i64) -> JoinHandle<()> {
        let store = self.clone();
        thread::spawn(move || match store.write(&entries, tag) {
            Ok(path) => {
                tracing::debug!(path = %path.display(), entries = entries.len(), "Wrote snapshot");
            }
            Err(e) => {
                tracing::error!(tag, error = %e, "Failed to write snapshot");
            }
        })
    }

    /// Rebuild an index from the snapshot file with the highest tag
    ///
    /// Orders candidates by the tag embedded in the filename, never by
    /// filesystem modification time: concurrent background writers may
    /// complete out of chronological order, and the contract is "highest
    /// logical tag wins."
    ///
    /// Errors:
    /// - `Io` — the directory cannot be listed or the file cannot be read
    /// - `NoSnapshotsFound` — directory readable but holds no snapshot files
    /// - `Serialization` — the chosen file does not parse
    pub fn read_latest(&self) -> Result<VersionedIndex> {
        let mut latest: Option<(i64, PathBuf)> = None;

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            if let Some(tag) = Self::parse_snapshot_tag(&path) {
                if latest.as_ref().map_or(true, |(best, _)| tag > *best) {
                    latest = Some((tag, path));
                }
            }
        }

        let (tag, path) = latest.ok_or(EpochError::NoSnapshotsFound)?;
        tracing::info!(tag, path = %path.display(), "Restoring from snapshot");

        let data = fs::read(&path)?;
        let payload: SnapshotPayload = serde_json::from_slice(&data)?;

        Ok(VersionedIndex::from_entries(payload.entries))
    }

    /// Get the snapshot directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Generate the file path for a snapshot with the given tag
    fn snapshot_path(&self, tag: i64) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", Self::FILE_PREFIX, tag, Self::FILE_SUFFIX))
    }

    /// Parse the tag from a snapshot filename
    /// "state_1700000000.json" → Some(1700000000)
    fn parse_snapshot_tag(path: &Path) -> Option<i64> {
        let name = path.file_name()?.to_str()?;
        let tag = name
            .strip_prefix(Self::FILE_PREFIX)?
            .strip_suffix(Self::FILE_SUFFIX)?;
        tag.parse().ok()
    }
}
