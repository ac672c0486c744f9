//! Ledger files: a JSON array of blocks.
//!
//! The dashboard's export shape (`data`, `userId`, `ipAddress`, `status`) is
//! accepted on read; writes always use the current field names.

use std::path::Path;

use tracing::debug;

use chainguard_contracts::{
    error::{ChainGuardError, ChainGuardResult},
    ledger::Block,
};

/// Read a ledger file. Linkage is not checked here; see `check_chain`.
pub fn read_ledger(path: &Path) -> ChainGuardResult<Vec<Block>> {
    let contents = std::fs::read_to_string(path).map_err(|source| ChainGuardError::LedgerIo {
        path: path.display().to_string(),
        source,
    })?;
    let blocks: Vec<Block> =
        serde_json::from_str(&contents).map_err(|e| ChainGuardError::LedgerFormat {
            reason: format!("'{}' is not a block array: {}", path.display(), e),
        })?;

    debug!(path = %path.display(), blocks = blocks.len(), "ledger file loaded");
    Ok(blocks)
}

/// Write `blocks` as pretty-printed JSON, replacing any existing file.
pub fn write_ledger(path: &Path, blocks: &[Block]) -> ChainGuardResult<()> {
    let json = serde_json::to_string_pretty(blocks).map_err(|e| ChainGuardError::LedgerFormat {
        reason: format!("failed to serialize ledger: {}", e),
    })?;
    std::fs::write(path, json).map_err(|source| ChainGuardError::LedgerIo {
        path: path.display().to_string(),
        source,
    })
}
