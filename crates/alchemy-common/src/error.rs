//! Error types shared across the alchemy helper crates.

use thiserror::Error;

/// Top-level error type for operations that cross the storage boundary.
#[derive(Debug, Error)]
pub enum AlchemyError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization errors
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Stored data was written by an incompatible schema
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },

    /// Atomic write (temp file + rename) failed
    #[error("Atomic write failed: {0}")]
    AtomicWriteFailed(String),
}

/// Result type alias for cross-crate operations.
pub type AlchemyResult<T> = Result<T, AlchemyError>;
