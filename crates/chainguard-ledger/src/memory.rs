//! In-memory implementation of `LedgerWriter`.
//!
//! `InMemoryLedger` keeps sealed blocks and the pending-record queue behind
//! one `Mutex`, so a simulator thread can submit while another thread seals
//! or snapshots. Use `snapshot()` to hand an owned copy to the analyzer and
//! `verify_integrity()` to re-check the linkage at any time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use chainguard_contracts::{
    error::{ChainGuardError, ChainGuardResult},
    ledger::{AccessRecord, Block},
};
use chainguard_core::traits::LedgerWriter;

use crate::chain::{find_nonce, verify_chain};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Sealing policy for an `InMemoryLedger`.
///
/// Example in TOML:
/// ```toml
/// max_block_size = 5
/// difficulty_prefix = "0"
/// max_nonce = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Most records a single block may hold.
    pub max_block_size: usize,
    /// Hex prefix the nonce search tries to reach.
    pub difficulty_prefix: String,
    /// Last nonce tried before sealing with whatever hash was reached.
    pub max_nonce: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_block_size: 5,
            difficulty_prefix: "0".to_string(),
            max_nonce: 10_000,
        }
    }
}

impl LedgerConfig {
    pub fn from_toml_str(s: &str) -> ChainGuardResult<Self> {
        let config: LedgerConfig = toml::from_str(s).map_err(|e| ChainGuardError::ConfigError {
            reason: format!("failed to parse ledger TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a zero block size or a non-hex difficulty prefix.
    pub fn validate(&self) -> ChainGuardResult<()> {
        if self.max_block_size == 0 {
            return Err(ChainGuardError::ConfigError {
                reason: "max_block_size must be greater than zero".to_string(),
            });
        }
        if !self.difficulty_prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChainGuardError::ConfigError {
                reason: format!(
                    "difficulty_prefix '{}' is not a hex string",
                    self.difficulty_prefix
                ),
            });
        }
        Ok(())
    }
}

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct LedgerState {
    /// Sealed blocks, genesis first.
    pub(crate) blocks: Vec<Block>,

    /// Records waiting for a block, oldest first.
    pub(crate) pending: VecDeque<AccessRecord>,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An append-only ledger that batches records into hash-linked blocks.
pub struct InMemoryLedger {
    config: LedgerConfig,
    pub(crate) state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    /// Create a ledger holding only the genesis block.
    pub fn new(config: LedgerConfig, genesis_time: DateTime<Utc>) -> Self {
        let state = LedgerState {
            blocks: vec![Block::genesis(genesis_time)],
            pending: VecDeque::new(),
        };
        Self {
            config,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Number of sealed blocks, genesis included.
    pub fn height(&self) -> usize {
        self.state.lock().expect("ledger state lock poisoned").blocks.len()
    }

    /// Number of records not yet sealed.
    pub fn pending_len(&self) -> usize {
        self.state.lock().expect("ledger state lock poisoned").pending.len()
    }

    /// Seal blocks until the pending queue is empty.
    pub fn seal_all(&self, now: DateTime<Utc>) -> ChainGuardResult<Vec<Block>> {
        let mut sealed = Vec::new();
        while let Some(block) = self.seal(now)? {
            sealed.push(block);
        }
        Ok(sealed)
    }

    /// Re-check linkage and hashes of every sealed block.
    pub fn verify_integrity(&self) -> bool {
        let state = self.state.lock().expect("ledger state lock poisoned");
        verify_chain(&state.blocks)
    }

    fn lock_for_write(&self) -> ChainGuardResult<std::sync::MutexGuard<'_, LedgerState>> {
        self.state.lock().map_err(|e| ChainGuardError::LedgerWriteFailed {
            reason: format!("ledger state lock poisoned: {}", e),
        })
    }
}

// ── LedgerWriter impl ─────────────────────────────────────────────────────────

impl LedgerWriter for InMemoryLedger {
    fn submit(&self, record: AccessRecord) -> ChainGuardResult<()> {
        let mut state = self.lock_for_write()?;
        state.pending.push_back(record);
        Ok(())
    }

    /// Drain up to `max_block_size` pending records, oldest first, run the
    /// nonce search and append the block.
    fn seal(&self, now: DateTime<Utc>) -> ChainGuardResult<Option<Block>> {
        let mut state = self.lock_for_write()?;
        if state.pending.is_empty() {
            return Ok(None);
        }

        let take = state.pending.len().min(self.config.max_block_size.max(1));
        let records: Vec<AccessRecord> = state.pending.drain(..take).collect();

        let index = state.blocks.len() as u64;
        let previous_hash = state
            .blocks
            .last()
            .map(|b| b.hash.clone())
            .unwrap_or_else(|| Block::GENESIS_HASH.to_string());

        let (nonce, hash) = find_nonce(
            index,
            now,
            &previous_hash,
            &records,
            &self.config.difficulty_prefix,
            self.config.max_nonce,
        );

        debug!(index, nonce, "nonce search finished");

        let block = Block {
            index,
            timestamp: now,
            records,
            previous_hash,
            hash,
            nonce,
        };
        state.blocks.push(block.clone());

        info!(
            index = block.index,
            records = block.records.len(),
            pending = state.pending.len(),
            hash = %block.hash,
            "block sealed"
        );

        Ok(Some(block))
    }

    fn snapshot(&self) -> Vec<Block> {
        self.state.lock().expect("ledger state lock poisoned").blocks.clone()
    }
}
