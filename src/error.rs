//! Error types for epochkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using EpochError
pub type Result<T> = std::result::Result<T, EpochError>;

/// Unified error type for epochkv operations
#[derive(Debug, Error)]
pub enum EpochError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot directory is readable but holds no snapshot files.
    /// Distinct from `Io` so a first-run startup can start empty instead
    /// of treating it as a misconfiguration.
    #[error("No snapshot files found")]
    NoSnapshotsFound,

    // -------------------------------------------------------------------------
    // Actor Errors
    // -------------------------------------------------------------------------
    /// The store actor's inbox is closed (actor stopped or never started).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A get waited longer than the caller-side timeout for its reply.
    #[error("Timed out waiting for store response")]
    ResponseTimeout,
}
