//! Error types for the `sparkfield-store` crate.
//!
//! All fallible store operations return [`StoreError`].

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Backing storage could not grow to hold another record.
    #[error("out of memory: cannot hold more than {capacity} particle records")]
    OutOfMemory {
        /// Number of records the store could hold when the request failed.
        capacity: usize,
    },

    /// The handle does not refer to a live record of this store.
    ///
    /// Handles are single-use after `remove`; passing a stale, foreign, or
    /// `end` handle is a caller contract violation.
    #[error("invalid particle handle passed to {operation}")]
    InvalidHandle {
        /// The store operation that rejected the handle.
        operation: &'static str,
    },

    /// The store's index links disagree with its own records.
    #[error("corrupted store links: {context}")]
    CorruptLinks {
        /// What was being traversed when the mismatch was found.
        context: &'static str,
    },
}
