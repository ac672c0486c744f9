//! Threat report types produced by the analysis engine.
//!
//! A `ThreatReport` is a fresh value per analysis pass. Nothing in it refers
//! back to the ledger it was computed from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall threat tier of a report, derived from the accumulated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "LOW",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::High => "HIGH",
            ThreatLevel::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Severity of a single anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// The pattern an anomaly was detected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    /// Repeated denied attempts from one source address.
    BruteForce,
    /// Too many requests from one source address inside the window.
    HighVelocity,
    /// Reserved. No detection rule emits it yet.
    PolicyViolation,
    /// One actor seen from too many distinct source addresses.
    SuspiciousUser,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::BruteForce => "BRUTE_FORCE",
            AnomalyKind::HighVelocity => "HIGH_VELOCITY",
            AnomalyKind::PolicyViolation => "POLICY_VIOLATION",
            AnomalyKind::SuspiciousUser => "SUSPICIOUS_USER",
        }
    }

    /// Short prefix used when building anomaly ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            AnomalyKind::BruteForce => "bf",
            AnomalyKind::HighVelocity => "vel",
            AnomalyKind::PolicyViolation => "pol",
            AnomalyKind::SuspiciousUser => "usr",
        }
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One detected pattern, attributed to a source address or an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    /// Unique within the report that contains it.
    pub id: String,

    /// Source address or actor identity the anomaly is attributed to.
    pub entity: String,

    #[serde(rename = "type")]
    pub kind: AnomalyKind,

    pub severity: Severity,

    pub description: String,

    /// Timestamp of the last record in the sequence that triggered the rule.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Request count, failure count, or distinct-address count, by `kind`.
    pub count: usize,
}

/// Summary counters attached to every report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    /// Every record in the ledger, regardless of age.
    pub total_scanned: usize,
    /// Number of anomalies in the report.
    pub suspicious_count: usize,
    /// Distinct source addresses seen inside the analysis window.
    #[serde(rename = "uniqueIPs")]
    pub unique_ips: usize,
}

/// Aggregated output of one analysis pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatReport {
    /// The instant the analysis ran; also the end of the analysis window.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub generated_at: DateTime<Utc>,

    pub overall_threat_level: ThreatLevel,

    /// Accumulated risk score, clamped to `0..=100`.
    pub score: u8,

    /// HIGH severity anomalies first, detection order otherwise.
    pub anomalies: Vec<Anomaly>,

    pub stats: ReportStats,
}

impl ThreatReport {
    /// Anomalies of the given kind, in report order.
    pub fn anomalies_of(&self, kind: AnomalyKind) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter().filter(move |a| a.kind == kind)
    }
}
