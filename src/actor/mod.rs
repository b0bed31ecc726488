//! Store Actor Module
//!
//! Exclusive-owner actor over the versioned index.
//!
//! ## Responsibilities
//! - Sole reader and mutator of one `VersionedIndex`
//! - Serialize get/put/snapshot messages through a single FIFO inbox
//! - Track a dirty flag so redundant snapshot requests are cheap no-ops
//! - Hand point-in-time copies to the snapshot writer without blocking
//!
//! ## Concurrency Model: Exclusive Writer
//!
//! One dedicated thread owns the index. Everything else — request-layer
//! callers, the snapshot scheduler, in-flight snapshot writers — runs
//! concurrently but only ever talks to the index through messages. A single
//! consumer on a single FIFO channel gives linearizable access with no
//! locks: messages are processed one at a time, in receipt order.

mod message;
mod store;

pub use message::{Message, StoreHandle};
pub use store::{RunningStore, StoreActor};
