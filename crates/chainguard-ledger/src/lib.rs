//! # chainguard-ledger
//!
//! Simulated append-only access-log ledger for the ChainGuard runtime.
//!
//! ## Overview
//!
//! Access records are queued as they arrive and sealed into blocks of at
//! most `max_block_size` records. Each block links to its predecessor by
//! SHA-256 hash and carries a nonce found by a toy search for a hash prefix.
//! `verify_chain` re-checks linkage and hashes. None of this is real
//! proof-of-work; it models the ledger the analysis engine reads.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chainguard_ledger::{InMemoryLedger, LedgerConfig};
//! use chainguard_core::traits::LedgerWriter;
//!
//! let ledger = InMemoryLedger::new(LedgerConfig::default(), Utc::now());
//! ledger.submit(record)?;
//! ledger.seal(Utc::now())?;
//!
//! assert!(ledger.verify_integrity());
//! ```

pub mod chain;
pub mod file;
pub mod memory;

pub use chain::{check_chain, find_nonce, hash_block, verify_chain};
pub use file::{read_ledger, write_ledger};
pub use memory::{InMemoryLedger, LedgerConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
