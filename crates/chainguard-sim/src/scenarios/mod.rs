//! Demo scenarios.
//!
//! Each scenario scripts a slice of access traffic, pushes it through a real
//! `InMemoryLedger` and `HeuristicEngine` wired by a `Monitor`, verifies the
//! chain, and prints the resulting threat report.

pub mod account_sharing;
pub mod brute_force;
pub mod random_traffic;
pub mod traffic_burst;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use chainguard_analysis::HeuristicEngine;
use chainguard_contracts::{
    error::ChainGuardResult,
    ledger::{AccessRecord, Block},
    report::ThreatReport,
};
use chainguard_core::{
    traits::{FixedClock, LedgerWriter},
    Monitor,
};
use chainguard_ledger::InMemoryLedger;

use crate::config::RuntimeConfig;

/// Everything a scenario run leaves behind.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub report: ThreatReport,
    pub blocks: Vec<Block>,
    pub integrity_ok: bool,
}

// ── Arc-wrapped ledger helper ─────────────────────────────────────────────────

/// Lets an `Arc<InMemoryLedger>` be handed to the monitor as
/// `Box<dyn LedgerWriter>` while the scenario keeps a handle for
/// `verify_integrity()`.
struct SharedLedger(Arc<InMemoryLedger>);

impl LedgerWriter for SharedLedger {
    fn submit(&self, record: AccessRecord) -> ChainGuardResult<()> {
        self.0.submit(record)
    }
    fn seal(&self, now: DateTime<Utc>) -> ChainGuardResult<Option<Block>> {
        self.0.seal(now)
    }
    fn snapshot(&self) -> Vec<Block> {
        self.0.snapshot()
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Submit `records`, seal every block, and scan the ledger as of `now`.
pub fn run_pipeline(
    records: Vec<AccessRecord>,
    now: DateTime<Utc>,
    config: &RuntimeConfig,
) -> ChainGuardResult<ScenarioOutcome> {
    let ledger = Arc::new(InMemoryLedger::new(
        config.ledger.clone(),
        now - Duration::minutes(30),
    ));

    let monitor = Monitor::new(
        Box::new(SharedLedger(Arc::clone(&ledger))),
        Box::new(HeuristicEngine::new(config.analysis.clone())),
        Box::new(FixedClock::new(now)),
    );

    for record in records {
        monitor.record(record)?;
    }
    monitor.seal_pending()?;

    let report = monitor.scan();
    let integrity_ok = ledger.verify_integrity();
    if !integrity_ok {
        warn!("scenario ledger failed verification");
    }

    Ok(ScenarioOutcome {
        report,
        blocks: monitor.ledger(),
        integrity_ok,
    })
}

/// Print a report and the chain summary in the demo's plain-text layout.
pub fn print_outcome(outcome: &ScenarioOutcome) {
    let report = &outcome.report;
    let record_count: usize = outcome.blocks.iter().map(|b| b.records.len()).sum();

    println!(
        "  Ledger:                 {} block(s), {} record(s), integrity {}",
        outcome.blocks.len(),
        record_count,
        if outcome.integrity_ok { "VERIFIED" } else { "FAILED" }
    );
    print_report(report);
}

/// Print a threat report.
pub fn print_report(report: &ThreatReport) {
    println!("  Threat level:           {}", report.overall_threat_level);
    println!("  Risk score:             {}/100", report.score);
    println!(
        "  Scanned / unique IPs:   {} / {}",
        report.stats.total_scanned, report.stats.unique_ips
    );
    println!("  Anomalies:              {}", report.stats.suspicious_count);
    for anomaly in &report.anomalies {
        println!(
            "    [{:<6}] {:<15} {:<18} {}",
            anomaly.severity,
            anomaly.kind,
            anomaly.entity,
            anomaly.description
        );
    }
}

/// Run every scenario in order.
pub fn run_all(now: DateTime<Utc>, config: &RuntimeConfig) -> ChainGuardResult<()> {
    brute_force::run_scenario(now, config)?;
    traffic_burst::run_scenario(now, config)?;
    account_sharing::run_scenario(now, config)?;
    random_traffic::run_scenario(now, config, random_traffic::DEFAULT_SEED)?;
    Ok(())
}
