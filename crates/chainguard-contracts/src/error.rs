//! Runtime error types for the ChainGuard crates.
//!
//! The threat analysis engine itself is total and never returns an error.
//! Everything around it (configuration loading, ledger writes, ledger files)
//! returns `ChainGuardResult<T>`.

use thiserror::Error;

/// The unified error type for the ChainGuard runtime.
#[derive(Debug, Error)]
pub enum ChainGuardError {
    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The ledger could not accept a record or seal a block.
    #[error("ledger write failed: {reason}")]
    LedgerWriteFailed { reason: String },

    /// A ledger file could not be read or written.
    #[error("ledger I/O error on '{path}': {source}")]
    LedgerIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A ledger file was readable but not a valid block sequence.
    #[error("ledger format error: {reason}")]
    LedgerFormat { reason: String },

    /// Block linkage or hash recomputation failed.
    #[error("chain integrity violated at block {index}: {reason}")]
    ChainIntegrity { index: u64, reason: String },
}

/// Convenience alias used throughout the ChainGuard crates.
pub type ChainGuardResult<T> = Result<T, ChainGuardError>;
