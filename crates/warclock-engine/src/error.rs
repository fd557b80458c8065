//! Error types for the Warclock engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup. Once the drivers are running,
//! failures are logged and survived rather than propagated -- the tick
//! cadence must outlive any single bad iteration.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: warclock_core::config::ConfigError,
    },

    /// Reading the inbound feed failed.
    #[error("feed error: {source}")]
    Feed {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
