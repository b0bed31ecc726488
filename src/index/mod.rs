//! Versioned Index Module
//!
//! In-memory, ordered, multi-version container for all stored data.
//!
//! ## Responsibilities
//! - Hold every `(key, version)` write, ordered by `(key ASC, version ASC)`
//! - Exact-duplicate replace on `(key, version)` collisions
//! - Point lookups pivoting on `(key, version)`
//! - Ordered iteration for snapshot serialization
//!
//! ## Data Structure Choice
//! BTreeMap keyed by the `(String, i64)` composite:
//! - Ordered keys give the multi-version total order for free
//! - Insert on the composite key is exactly the replace-on-duplicate rule
//! - No internal locking: the index is always owned by exactly one task
//!   (the store actor), so concurrency is handled above this layer

mod table;

pub use table::VersionedIndex;

use serde::{Deserialize, Serialize};

/// One stored `(key, value, version)` record
///
/// `version` is a caller-supplied ordering token (a logical or wall-clock
/// timestamp). It is never validated for monotonicity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedEntry {
    pub key: String,
    pub value: String,
    pub version: i64,
}

impl VersionedEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, version: i64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            version,
        }
    }
}
