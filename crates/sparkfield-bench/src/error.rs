//! Error types for the benchmark driver.

/// Top-level error for the benchmark binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: sparkfield_core::config::ConfigError,
    },

    /// A store could not be built.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: sparkfield_store::StoreError,
    },

    /// A simulator could not be built.
    #[error("simulator error: {source}")]
    Simulator {
        /// The underlying simulator error.
        #[from]
        source: sparkfield_core::SimulatorError,
    },

    /// A run failed partway.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: sparkfield_core::runner::RunnerError,
    },

    /// The final sprites could not be collected.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying snapshot error.
        #[from]
        source: sparkfield_core::SnapshotError,
    },

    /// The snapshot file could not be written.
    #[error("failed to write snapshot {path}: {source}")]
    SnapshotWrite {
        /// Destination that failed.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot could not be encoded.
    #[error("failed to encode snapshot: {source}")]
    SnapshotEncode {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
