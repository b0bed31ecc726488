//! # epochkv
//!
//! An in-memory, multi-version key-value store with:
//! - A single exclusive-writer actor owning all stored state
//! - Multi-version `(key, version)` ordering and point lookups
//! - Periodic best-effort crash-recovery snapshots to disk
//! - Snapshot restore on startup
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Request Layer                             │
//! │              (HTTP adapter, out of core)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │                    ┌──────────────────┐
//! ┌─────────────────────▼──────────────┐    │    Snapshot      │
//! │            Request Bus             │◄───┤    Scheduler     │
//! │      (FIFO inbox, one consumer)    │    │  (periodic tick) │
//! └─────────────────────┬──────────────┘    └──────────────────┘
//!                       │
//! ┌─────────────────────▼──────────────┐
//! │            Store Actor             │
//! │   (sole owner, serialized loop)    │
//! └─────────┬──────────────────┬───────┘
//!           │                  │ point-in-time copy
//!           ▼                  ▼
//!   ┌──────────────┐   ┌──────────────┐
//!   │  Versioned   │   │   Snapshot   │
//!   │    Index     │   │  Persistence │
//!   │  (BTreeMap)  │   │ (state_<t>)  │
//!   └──────────────┘   └──────────────┘
//! ```
//!
//! There is no write-ahead log: the durability window equals the snapshot
//! interval. Old versions are never compacted; every write is retained.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod index;
pub mod actor;
pub mod snapshot;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{EpochError, Result};
pub use config::Config;
pub use index::{VersionedEntry, VersionedIndex};
pub use actor::{RunningStore, StoreActor, StoreHandle};
pub use snapshot::{RunningScheduler, SnapshotScheduler, SnapshotStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of epochkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
