//! Heuristic threat analysis engine.
//!
//! `HeuristicEngine` turns a ledger into a `ThreatReport` in one pass:
//!
//! 1. Flatten every block's records; keep those inside the trailing window.
//! 2. Group the windowed records by source address and by actor.
//! 3. Per address group: HIGH_VELOCITY, then BRUTE_FORCE.
//!    Per actor group: SUSPICIOUS_USER.
//! 4. Sum contributions; the tier comes from the unclamped sum, the reported
//!    score is clamped to 100.
//! 5. Move HIGH severity anomalies to the front, detection order otherwise.
//!
//! The engine never fails and never mutates its input.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use chainguard_contracts::{
    error::{ChainGuardError, ChainGuardResult},
    ledger::{AccessRecord, Block},
    report::{Anomaly, AnomalyKind, ReportStats, Severity, ThreatReport},
};
use chainguard_core::traits::ThreatAnalyzer;

use crate::{
    config::AnalysisConfig,
    window::{flatten, group_by, within_window, Group},
};

/// Highest score a report will carry.
const MAX_SCORE: u32 = 100;

/// A `ThreatAnalyzer` driven by an `AnalysisConfig`.
///
/// ```rust,ignore
/// use chainguard_analysis::HeuristicEngine;
///
/// let engine = HeuristicEngine::default();
/// let report = engine.analyze(&blocks, Utc::now());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeuristicEngine {
    config: AnalysisConfig,
}

impl HeuristicEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Parse `s` as TOML and build an engine from it.
    pub fn from_toml_str(s: &str) -> ChainGuardResult<Self> {
        Ok(Self::new(AnalysisConfig::from_toml_str(s)?))
    }

    /// Read the file at `path` and parse it as an analysis configuration.
    pub fn from_file(path: &Path) -> ChainGuardResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ChainGuardError::ConfigError {
            reason: format!("failed to read analysis config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze `ledger` as of `now`.
    pub fn analyze(&self, ledger: &[Block], now: DateTime<Utc>) -> ThreatReport {
        let all_records = flatten(ledger);
        let recent = within_window(&all_records, now, self.config.window());

        let by_address = group_by(&recent, |r| r.source_address.as_str());
        let by_actor = group_by(&recent, |r| r.actor_id.as_str());

        debug!(
            total = all_records.len(),
            recent = recent.len(),
            addresses = by_address.len(),
            actors = by_actor.len(),
            "analysis window built"
        );

        let mut findings = Findings::new(now);

        for group in &by_address {
            self.check_velocity(group, &mut findings);
            self.check_brute_force(group, &mut findings);
        }
        for group in &by_actor {
            self.check_suspicious_user(group, &mut findings);
        }

        let raw_score = findings.score;
        let overall_threat_level = self.config.levels.level_for(raw_score);
        let mut anomalies = findings.anomalies;

        // Stable: HIGH first, everything else keeps detection order.
        anomalies.sort_by_key(|a| a.severity != Severity::High);

        debug!(
            raw_score,
            level = %overall_threat_level,
            anomalies = anomalies.len(),
            "analysis complete"
        );

        ThreatReport {
            generated_at: now,
            overall_threat_level,
            score: raw_score.min(MAX_SCORE) as u8,
            stats: ReportStats {
                total_scanned: all_records.len(),
                suspicious_count: anomalies.len(),
                unique_ips: by_address.len(),
            },
            anomalies,
        }
    }

    fn check_velocity(&self, group: &Group<'_>, findings: &mut Findings) {
        let rule = &self.config.velocity;
        let count = group.records.len();
        if count <= rule.max_requests {
            return;
        }
        if let Some(last) = group.records.last() {
            findings.emit(
                AnomalyKind::HighVelocity,
                Severity::Medium,
                group.key,
                format!("Unusual traffic volume: {} requests in short window.", count),
                last,
                count,
                rule.score,
            );
        }
    }

    fn check_brute_force(&self, group: &Group<'_>, findings: &mut Findings) {
        let rule = &self.config.brute_force;
        let failures: Vec<&AccessRecord> =
            group.records.iter().copied().filter(|r| r.is_denied()).collect();
        if failures.len() < rule.min_failures {
            return;
        }
        if let Some(last) = failures.last() {
            findings.emit(
                AnomalyKind::BruteForce,
                Severity::High,
                group.key,
                format!("Potential Brute Force: {} failed access attempts.", failures.len()),
                last,
                failures.len(),
                rule.score,
            );
        }
    }

    fn check_suspicious_user(&self, group: &Group<'_>, findings: &mut Findings) {
        let rule = &self.config.suspicious_user;
        let addresses: HashSet<&str> =
            group.records.iter().map(|r| r.source_address.as_str()).collect();
        if addresses.len() <= rule.max_addresses {
            return;
        }
        if let Some(last) = group.records.last() {
            findings.emit(
                AnomalyKind::SuspiciousUser,
                Severity::Medium,
                group.key,
                format!("Account accessed from {} distinct IPs recently.", addresses.len()),
                last,
                addresses.len(),
                rule.score,
            );
        }
    }
}

impl ThreatAnalyzer for HeuristicEngine {
    fn analyze(&self, ledger: &[Block], now: DateTime<Utc>) -> ThreatReport {
        HeuristicEngine::analyze(self, ledger, now)
    }
}

/// Analyze `ledger` as of `now` with the built-in policy constants.
pub fn analyze(ledger: &[Block], now: DateTime<Utc>) -> ThreatReport {
    HeuristicEngine::default().analyze(ledger, now)
}

// ── Accumulator ───────────────────────────────────────────────────────────────

/// Anomalies and score collected during one pass.
struct Findings {
    generated_at_ms: i64,
    anomalies: Vec<Anomaly>,
    score: u32,
    sequence: usize,
}

impl Findings {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            generated_at_ms: now.timestamp_millis(),
            anomalies: Vec::new(),
            score: 0,
            sequence: 0,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit(
        &mut self,
        kind: AnomalyKind,
        severity: Severity,
        entity: &str,
        description: String,
        trigger: &AccessRecord,
        count: usize,
        contribution: u32,
    ) {
        // The sequence number keeps ids unique even if two detections share
        // kind, entity and generation time.
        let id = format!(
            "{}-{}-{}-{}",
            kind.id_prefix(),
            entity,
            self.generated_at_ms,
            self.sequence
        );
        self.sequence += 1;

        debug!(
            anomaly_id = %id,
            kind = %kind,
            severity = %severity,
            entity = %entity,
            count,
            contribution,
            "anomaly detected"
        );

        self.anomalies.push(Anomaly {
            id,
            entity: entity.to_string(),
            kind,
            severity,
            description,
            timestamp: trigger.timestamp,
            count,
        });
        self.score = self.score.saturating_add(contribution);
    }
}
