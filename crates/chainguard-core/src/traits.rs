//! Core trait definitions for the ChainGuard runtime.
//!
//! Three seams separate the analysis engine from its collaborators:
//!
//! - `Clock`          — the only source of "now"
//! - `LedgerWriter`   — append-only sink that batches records into blocks
//! - `ThreatAnalyzer` — pure transformation from a ledger to a report
//!
//! The `Monitor` wires them together; the analyzer never sees the writer.

use chrono::{DateTime, Utc};

use chainguard_contracts::{
    error::ChainGuardResult,
    ledger::{AccessRecord, Block},
    report::ThreatReport,
};

/// A source of the current instant.
///
/// Analysis reads the clock once per pass so windowing and the report's
/// `generated_at` always agree.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, for deterministic runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// The append-only ledger that records flow into.
///
/// Implementations queue submitted records and seal them into blocks on
/// demand. Sealed blocks are never modified or removed.
pub trait LedgerWriter: Send + Sync {
    /// Queue one record for inclusion in a future block.
    fn submit(&self, record: AccessRecord) -> ChainGuardResult<()>;

    /// Seal the next block from pending records.
    ///
    /// Returns `Ok(None)` when nothing is pending.
    fn seal(&self, now: DateTime<Utc>) -> ChainGuardResult<Option<Block>>;

    /// Owned copy of every sealed block, genesis first.
    fn snapshot(&self) -> Vec<Block>;
}

/// A threat analysis pass over a ledger.
///
/// Implementations must be total: every structurally valid ledger, the empty
/// one included, produces a report. `now` is the end of the analysis window
/// and the report's `generated_at`.
pub trait ThreatAnalyzer: Send + Sync {
    fn analyze(&self, ledger: &[Block], now: DateTime<Utc>) -> ThreatReport;
}
