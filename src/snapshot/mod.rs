//! Snapshot Module
//!
//! Best-effort crash-recovery persistence for the versioned index.
//!
//! ## Responsibilities
//! - Serialize point-in-time index copies to tagged files on disk
//! - Find and restore the most recent snapshot at startup
//! - Periodically trigger snapshots through the store actor
//!
//! ## File Format
//! One JSON document per snapshot, named `state_<tag>.json` where `<tag>`
//! is the wall-clock Unix second at which the snapshot was scheduled:
//! ```text
//! {
//!   "entries": [
//!     { "key": "...", "value": "...", "version": 42 },
//!     ...
//!   ]
//! }
//! ```
//! Entries appear in `(key ASC, version ASC)` order. Files are full dumps,
//! never deltas, and are never mutated or deleted by this subsystem.

mod persistence;
mod scheduler;

pub use persistence::SnapshotStore;
pub use scheduler::{RunningScheduler, SnapshotScheduler};
