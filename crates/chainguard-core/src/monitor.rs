//! The ledger monitor: records in, blocks sealed, reports out.
//!
//! The monitor owns the three collaborators of an analysis pass and fixes
//! their ordering:
//!
//!   submit → seal (until nothing is pending) → snapshot → analyze
//!
//! The analyzer only ever receives an owned snapshot, so a pass cannot
//! observe or disturb a concurrent writer.

use tracing::{debug, info};

use chainguard_contracts::{
    error::ChainGuardResult,
    ledger::{AccessRecord, Block},
    report::ThreatReport,
};

use crate::traits::{Clock, LedgerWriter, ThreatAnalyzer};

/// Drives a ledger and an analyzer from a single clock.
pub struct Monitor {
    ledger: Box<dyn LedgerWriter>,
    analyzer: Box<dyn ThreatAnalyzer>,
    clock: Box<dyn Clock>,
}

impl Monitor {
    pub fn new(
        ledger: Box<dyn LedgerWriter>,
        analyzer: Box<dyn ThreatAnalyzer>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self { ledger, analyzer, clock }
    }

    /// Queue a record on the ledger.
    pub fn record(&self, record: AccessRecord) -> ChainGuardResult<()> {
        debug!(
            record_id = %record.id,
            actor = %record.actor_id,
            address = %record.source_address,
            outcome = %record.outcome,
            "record submitted"
        );
        self.ledger.submit(record)
    }

    /// Seal blocks until no records are pending. Returns the new blocks.
    pub fn seal_pending(&self) -> ChainGuardResult<Vec<Block>> {
        let mut sealed = Vec::new();
        while let Some(block) = self.ledger.seal(self.clock.now())? {
            sealed.push(block);
        }
        Ok(sealed)
    }

    /// Run one analysis pass over the current ledger.
    ///
    /// The clock is read exactly once.
    pub fn scan(&self) -> ThreatReport {
        let now = self.clock.now();
        let blocks = self.ledger.snapshot();
        let report = self.analyzer.analyze(&blocks, now);

        info!(
            blocks = blocks.len(),
            level = %report.overall_threat_level,
            score = report.score,
            anomalies = report.anomalies.len(),
            "ledger scan complete"
        );

        report
    }

    /// Owned copy of the sealed ledger.
    pub fn ledger(&self) -> Vec<Block> {
        self.ledger.snapshot()
    }
}
