//! Block hashing, the toy nonce search, and linkage verification.
//!
//! Hash input layout (bytes, in order):
//!   1. index as 8-byte little-endian
//!   2. timestamp (ms since epoch) as 8-byte little-endian
//!   3. previous_hash as UTF-8 bytes
//!   4. canonical JSON of the record list (serde_json, no pretty-printing)
//!   5. nonce as 8-byte little-endian
//!
//! The nonce search only imitates proof-of-work for the demo; nothing here
//! provides real tamper evidence.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::warn;

use chainguard_contracts::{
    error::{ChainGuardError, ChainGuardResult},
    ledger::{AccessRecord, Block},
};

/// Compute the SHA-256 hash of a block's contents.
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `records` cannot be serialized to JSON, which cannot happen
/// for the plain-data `AccessRecord` type.
pub fn hash_block(
    index: u64,
    timestamp: DateTime<Utc>,
    previous_hash: &str,
    records: &[AccessRecord],
    nonce: u64,
) -> String {
    let records_json =
        serde_json::to_vec(records).expect("AccessRecord must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(index.to_le_bytes());
    hasher.update(timestamp.timestamp_millis().to_le_bytes());
    hasher.update(previous_hash.as_bytes());
    hasher.update(&records_json);
    hasher.update(nonce.to_le_bytes());

    hex::encode(hasher.finalize())
}

/// Search nonces `0..=max_nonce` for a hash starting with `prefix`.
///
/// When the budget runs out the last attempt is returned as-is.
pub fn find_nonce(
    index: u64,
    timestamp: DateTime<Utc>,
    previous_hash: &str,
    records: &[AccessRecord],
    prefix: &str,
    max_nonce: u64,
) -> (u64, String) {
    let mut nonce = 0;
    let mut hash = hash_block(index, timestamp, previous_hash, records, nonce);

    while !hash.starts_with(prefix) && nonce < max_nonce {
        nonce += 1;
        hash = hash_block(index, timestamp, previous_hash, records, nonce);
    }

    (nonce, hash)
}

/// Check every linkage rule and report the first block that breaks one.
///
/// 1. Block 0 is the genesis block: no records, sentinel hash.
/// 2. Every block's `index` equals its position.
/// 3. Every later block's `previous_hash` equals its predecessor's `hash`.
/// 4. Every later block's `hash` equals the recomputed value.
///
/// An empty chain is valid.
pub fn check_chain(blocks: &[Block]) -> ChainGuardResult<()> {
    let mut expected_prev: Option<&str> = None;

    for (position, block) in blocks.iter().enumerate() {
        let fail = |reason: String| ChainGuardError::ChainIntegrity {
            index: block.index,
            reason,
        };

        if block.index != position as u64 {
            return Err(fail(format!("expected index {}, found {}", position, block.index)));
        }

        match expected_prev {
            None => {
                if !block.records.is_empty() || block.hash != Block::GENESIS_HASH {
                    return Err(fail("genesis block must be empty and carry the sentinel hash".to_string()));
                }
            }
            Some(prev) => {
                if block.previous_hash != prev {
                    return Err(fail("previous_hash does not match predecessor".to_string()));
                }
                let recomputed = hash_block(
                    block.index,
                    block.timestamp,
                    &block.previous_hash,
                    &block.records,
                    block.nonce,
                );
                if block.hash != recomputed {
                    return Err(fail("hash does not match block contents".to_string()));
                }
            }
        }

        expected_prev = Some(&block.hash);
    }

    Ok(())
}

/// `true` when `check_chain` accepts the chain.
pub fn verify_chain(blocks: &[Block]) -> bool {
    match check_chain(blocks) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "ledger chain verification failed");
            false
        }
    }
}
