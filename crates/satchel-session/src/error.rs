//! Error types for session store operations.

/// Error type for session store operations.
///
/// The in-memory store itself never fails; these variants cover the
/// surrounding surface (provider selection, sweeper setup) and give
/// fallible backends a place to report through.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No provider is registered under the requested name.
    #[error("Unknown session provider: {0}")]
    UnknownProvider(String),

    /// Error reported by a session provider backend.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration rejected before use.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, Error>;
