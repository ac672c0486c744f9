//! # chainguard-analysis
//!
//! Heuristic threat analysis over the ChainGuard access ledger.
//!
//! ## Overview
//!
//! [`HeuristicEngine`] implements the
//! [`ThreatAnalyzer`](chainguard_core::traits::ThreatAnalyzer) trait. It looks
//! at the records inside a trailing window (five minutes by default) and
//! applies three rules:
//!
//! | Rule | Trigger | Severity | Score |
//! |---|---|---|---|
//! | HIGH_VELOCITY | more than 5 records from one address | MEDIUM | +10 |
//! | BRUTE_FORCE | at least 3 DENIED records from one address | HIGH | +25 |
//! | SUSPICIOUS_USER | one actor from more than 2 addresses | MEDIUM | +15 |
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use chainguard_analysis::analyze;
//!
//! let report = analyze(&blocks, Utc::now());
//! println!("{} ({})", report.overall_threat_level, report.score);
//! ```

pub mod config;
pub mod digest;
pub mod engine;
mod window;

pub use config::AnalysisConfig;
pub use digest::{narrative_digest, DEFAULT_DIGEST_LIMIT};
pub use engine::{analyze, HeuristicEngine};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use chainguard_contracts::{
        ledger::{AccessRecord, AccessStatus, Block},
        report::{AnomalyKind, Severity, ThreatLevel},
    };
    use chainguard_core::traits::ThreatAnalyzer;

    use crate::{analyze, narrative_digest, HeuristicEngine};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn secs_ago(secs: i64) -> DateTime<Utc> {
        now() - Duration::seconds(secs)
    }

    fn rec(
        id: &str,
        when: DateTime<Utc>,
        actor: &str,
        addr: &str,
        outcome: AccessStatus,
    ) -> AccessRecord {
        AccessRecord {
            id: id.to_string(),
            timestamp: when,
            actor_id: actor.to_string(),
            source_address: addr.to_string(),
            action: "NETWORK_LOGIN".to_string(),
            outcome,
            reason: None,
            signature: format!("sig_{id}"),
        }
    }

    /// Genesis plus one block per chunk of `per_block` records.
    fn ledger(records: Vec<AccessRecord>, per_block: usize) -> Vec<Block> {
        let mut blocks = vec![Block::genesis(secs_ago(3_600))];
        for chunk in records.chunks(per_block) {
            blocks.push(Block {
                index: blocks.len() as u64,
                timestamp: now(),
                records: chunk.to_vec(),
                previous_hash: String::new(),
                hash: String::new(),
                nonce: 0,
            });
        }
        blocks
    }

    fn repeat(
        prefix: &str,
        n: usize,
        actor: &str,
        addr: &str,
        outcome: AccessStatus,
    ) -> Vec<AccessRecord> {
        (0..n)
            .map(|i| {
                rec(
                    &format!("{prefix}{i}"),
                    secs_ago(60 - i as i64),
                    actor,
                    addr,
                    outcome,
                )
            })
            .collect()
    }

    // ── Totality ──────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_ledger_is_low_and_clean() {
        let report = analyze(&[], now());
        assert_eq!(report.generated_at, now());
        assert_eq!(report.overall_threat_level, ThreatLevel::Low);
        assert_eq!(report.score, 0);
        assert!(report.anomalies.is_empty());
        assert_eq!(report.stats.total_scanned, 0);
        assert_eq!(report.stats.suspicious_count, 0);
        assert_eq!(report.stats.unique_ips, 0);
    }

    #[test]
    fn test_genesis_only_ledger_is_low_and_clean() {
        let report = analyze(&[Block::genesis(secs_ago(10))], now());
        assert_eq!(report.overall_threat_level, ThreatLevel::Low);
        assert_eq!(report.score, 0);
        assert!(report.anomalies.is_empty());
        assert_eq!(report.stats.total_scanned, 0);
    }

    // ── Individual rules ──────────────────────────────────────────────────────

    #[test]
    fn test_high_velocity_trigger() {
        let records = repeat("v", 6, "net_eng_04", "10.0.0.55", AccessStatus::Granted);
        let last_ts = records.last().unwrap().timestamp;
        let report = analyze(&ledger(records, 5), now());

        assert_eq!(report.anomalies.len(), 1);
        let anomaly = &report.anomalies[0];
        assert_eq!(anomaly.kind, AnomalyKind::HighVelocity);
        assert_eq!(anomaly.severity, Severity::Medium);
        assert_eq!(anomaly.entity, "10.0.0.55");
        assert_eq!(anomaly.count, 6);
        assert_eq!(anomaly.timestamp, last_ts);
        assert_eq!(
            anomaly.description,
            "Unusual traffic volume: 6 requests in short window."
        );
        assert!(anomaly.id.starts_with("vel-10.0.0.55-1700000000000"));

        assert_eq!(report.score, 10);
        assert_eq!(report.overall_threat_level, ThreatLevel::Low);
        assert_eq!(report.stats.unique_ips, 1);
        assert_eq!(report.stats.suspicious_count, 1);
        assert_eq!(report.stats.total_scanned, 6);
    }

    #[test]
    fn test_five_requests_do_not_trigger_velocity() {
        let records = repeat("v", 5, "net_eng_04", "10.0.0.55", AccessStatus::Granted);
        let report = analyze(&ledger(records, 5), now());
        assert!(report.anomalies.is_empty());
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_brute_force_trigger() {
        let records = repeat("d", 3, "guest_user_a", "45.22.11.90", AccessStatus::Denied);
        let report = analyze(&ledger(records, 5), now());

        assert_eq!(report.anomalies.len(), 1);
        let anomaly = &report.anomalies[0];
        assert_eq!(anomaly.kind, AnomalyKind::BruteForce);
        assert_eq!(anomaly.severity, Severity::High);
        assert_eq!(anomaly.entity, "45.22.11.90");
        assert_eq!(anomaly.count, 3);
        assert_eq!(
            anomaly.description,
            "Potential Brute Force: 3 failed access attempts."
        );

        // 25 is not greater than 25.
        assert_eq!(report.score, 25);
        assert_eq!(report.overall_threat_level, ThreatLevel::Low);
    }

    #[test]
    fn test_brute_force_timestamp_is_last_failure() {
        let records = vec![
            rec("1", secs_ago(50), "guest_user_a", "45.22.11.90", AccessStatus::Denied),
            rec("2", secs_ago(40), "guest_user_a", "45.22.11.90", AccessStatus::Denied),
            rec("3", secs_ago(30), "guest_user_a", "45.22.11.90", AccessStatus::Denied),
            rec("4", secs_ago(10), "guest_user_a", "45.22.11.90", AccessStatus::Granted),
        ];
        let report = analyze(&ledger(records, 5), now());

        let bf = report.anomalies_of(AnomalyKind::BruteForce).next().unwrap();
        assert_eq!(bf.timestamp, secs_ago(30));
    }

    #[test]
    fn test_pending_records_are_not_failures() {
        let mut records = repeat("d", 2, "guest_user_a", "45.22.11.90", AccessStatus::Denied);
        records.push(rec("p", secs_ago(5), "guest_user_a", "45.22.11.90", AccessStatus::Pending));
        let report = analyze(&ledger(records, 5), now());
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn test_suspicious_user_trigger() {
        let records = vec![
            rec("1", secs_ago(30), "sys_admin_01", "192.168.1.10", AccessStatus::Granted),
            rec("2", secs_ago(20), "sys_admin_01", "172.16.254.1", AccessStatus::Granted),
            rec("3", secs_ago(10), "sys_admin_01", "203.0.113.42", AccessStatus::Granted),
        ];
        let report = analyze(&ledger(records, 5), now());

        assert_eq!(report.anomalies.len(), 1);
        let anomaly = &report.anomalies[0];
        assert_eq!(anomaly.kind, AnomalyKind::SuspiciousUser);
        assert_eq!(anomaly.severity, Severity::Medium);
        assert_eq!(anomaly.entity, "sys_admin_01");
        assert_eq!(anomaly.count, 3);
        assert_eq!(anomaly.timestamp, secs_ago(10));
        assert_eq!(
            anomaly.description,
            "Account accessed from 3 distinct IPs recently."
        );
        assert_eq!(report.score, 15);
        assert_eq!(report.stats.unique_ips, 3);
    }

    /// Rule timestamps come from the time-sorted group, not ledger order.
    #[test]
    fn test_out_of_order_records_use_latest_timestamp() {
        let mut records = repeat("v", 6, "net_eng_04", "10.0.0.55", AccessStatus::Granted);
        records.reverse();
        let newest = records.iter().map(|r| r.timestamp).max().unwrap();
        let report = analyze(&ledger(records, 5), now());

        assert_eq!(report.anomalies[0].timestamp, newest);
    }

    // ── Windowing ─────────────────────────────────────────────────────────────

    #[test]
    fn test_stale_records_are_scanned_but_not_analyzed() {
        let mut records: Vec<AccessRecord> = (0..6)
            .map(|i| {
                rec(
                    &format!("old{i}"),
                    secs_ago(301 + i),
                    "guest_user_a",
                    "45.22.11.90",
                    AccessStatus::Denied,
                )
            })
            .collect();
        records.push(rec("fresh", secs_ago(5), "net_eng_04", "10.0.0.55", AccessStatus::Granted));

        let report = analyze(&ledger(records, 5), now());

        assert!(report.anomalies.is_empty());
        assert_eq!(report.stats.total_scanned, 7);
        assert_eq!(report.stats.unique_ips, 1, "only the fresh address is in the window");
    }

    #[test]
    fn test_record_exactly_at_window_edge_is_excluded() {
        let mut records = repeat("d", 2, "guest_user_a", "45.22.11.90", AccessStatus::Denied);
        records.push(rec("edge", secs_ago(300), "guest_user_a", "45.22.11.90", AccessStatus::Denied));
        let report = analyze(&ledger(records, 5), now());
        assert!(report.anomalies.is_empty());
    }

    // ── Aggregation & ordering ────────────────────────────────────────────────

    #[test]
    fn test_high_severity_first_and_detection_order_kept() {
        let mut records = repeat("a", 6, "alice", "10.0.0.1", AccessStatus::Granted);
        records.extend(repeat("b", 3, "bob", "10.0.0.2", AccessStatus::Denied));
        records.push(rec("c", secs_ago(20), "alice", "10.0.0.3", AccessStatus::Granted));
        records.push(rec("d", secs_ago(10), "alice", "10.0.0.4", AccessStatus::Granted));

        let report = analyze(&ledger(records, 5), now());

        let kinds: Vec<AnomalyKind> = report.anomalies.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnomalyKind::BruteForce,
                AnomalyKind::HighVelocity,
                AnomalyKind::SuspiciousUser,
            ]
        );
        // 10 + 25 + 15 = 50, which stays MEDIUM.
        assert_eq!(report.score, 50);
        assert_eq!(report.overall_threat_level, ThreatLevel::Medium);
        assert_eq!(report.stats.unique_ips, 4);
        assert_eq!(report.stats.suspicious_count, 3);
    }

    #[test]
    fn test_one_group_can_trigger_two_rules() {
        let records = repeat("x", 6, "unknown_attacker", "203.0.113.42", AccessStatus::Denied);
        let report = analyze(&ledger(records, 5), now());

        let kinds: Vec<AnomalyKind> = report.anomalies.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AnomalyKind::BruteForce, AnomalyKind::HighVelocity]);
        assert_eq!(report.score, 35);
        assert_eq!(report.overall_threat_level, ThreatLevel::Medium);
    }

    #[test]
    fn test_score_is_clamped_but_level_uses_raw_sum() {
        // Five brute-force addresses: 5 * 25 = 125.
        let mut records = Vec::new();
        for n in 0..5 {
            records.extend(repeat(
                &format!("ip{n}-"),
                3,
                &format!("actor{n}"),
                &format!("198.51.100.{n}"),
                AccessStatus::Denied,
            ));
        }
        let report = analyze(&ledger(records, 5), now());

        assert_eq!(report.anomalies.len(), 5);
        assert_eq!(report.score, 100);
        assert_eq!(report.overall_threat_level, ThreatLevel::Critical);
    }

    #[test]
    fn test_seventy_five_is_high_not_critical() {
        let mut records = Vec::new();
        for n in 0..3 {
            records.extend(repeat(
                &format!("ip{n}-"),
                3,
                &format!("actor{n}"),
                &format!("198.51.100.{n}"),
                AccessStatus::Denied,
            ));
        }
        let report = analyze(&ledger(records, 5), now());
        assert_eq!(report.score, 75);
        assert_eq!(report.overall_threat_level, ThreatLevel::High);
    }

    #[test]
    fn test_anomaly_ids_are_unique_within_a_report() {
        let mut records = repeat("x", 6, "unknown_attacker", "203.0.113.42", AccessStatus::Denied);
        records.push(rec("y", secs_ago(3), "unknown_attacker", "10.0.0.55", AccessStatus::Granted));
        records.push(rec("z", secs_ago(2), "unknown_attacker", "10.0.0.56", AccessStatus::Granted));
        let report = analyze(&ledger(records, 5), now());

        let ids: HashSet<&str> = report.anomalies.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), report.anomalies.len());
        assert_eq!(report.anomalies.len(), 3);
    }

    #[test]
    fn test_same_clock_gives_identical_reports() {
        let mut records = repeat("x", 6, "unknown_attacker", "203.0.113.42", AccessStatus::Denied);
        records.extend(repeat("g", 2, "net_eng_04", "10.0.0.55", AccessStatus::Granted));
        let chain = ledger(records, 5);

        let first = analyze(&chain, now());
        let second = analyze(&chain, now());
        assert_eq!(first, second);
    }

    // ── Configuration & trait use ─────────────────────────────────────────────

    #[test]
    fn test_configured_thresholds_change_detection() {
        let engine = HeuristicEngine::from_toml_str(
            r#"
            [brute_force]
            min_failures = 4
            score = 40
            "#,
        )
        .unwrap();

        let three = repeat("d", 3, "guest_user_a", "45.22.11.90", AccessStatus::Denied);
        assert!(engine.analyze(&ledger(three, 5), now()).anomalies.is_empty());

        let four = repeat("d", 4, "guest_user_a", "45.22.11.90", AccessStatus::Denied);
        let report = engine.analyze(&ledger(four, 5), now());
        assert_eq!(report.score, 40);
        assert_eq!(report.overall_threat_level, ThreatLevel::Medium);
    }

    #[test]
    fn test_engine_works_behind_the_analyzer_trait() {
        let analyzer: Box<dyn ThreatAnalyzer> = Box::new(HeuristicEngine::default());
        let records = repeat("d", 3, "guest_user_a", "45.22.11.90", AccessStatus::Denied);
        let report = analyzer.analyze(&ledger(records, 5), now());
        assert_eq!(report.score, 25);
    }

    #[test]
    fn test_missing_config_file_is_a_config_error() {
        let err = HeuristicEngine::from_file(std::path::Path::new("/nonexistent/analysis.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to read analysis config"));
    }

    // ── Narrative digest ──────────────────────────────────────────────────────

    #[test]
    fn test_digest_keeps_the_most_recent_records() {
        let mut records = repeat("g", 4, "net_eng_04", "10.0.0.55", AccessStatus::Granted);
        records[3].outcome = AccessStatus::Denied;
        records[3].reason = Some("Firewall Block".to_string());
        let chain = ledger(records, 3);

        let digest = narrative_digest(&chain, 2);
        let entries = digest.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["user"], "net_eng_04");
        assert_eq!(entries[1]["ip"], "10.0.0.55");
        assert_eq!(entries[1]["status"], "DENIED");
        assert_eq!(entries[1]["reason"], "Firewall Block");
        assert!(entries[0]["reason"].is_null());
        assert!(entries[0]["time"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_digest_of_empty_ledger_is_empty() {
        let digest = narrative_digest(&[Block::genesis(now())], 50);
        assert_eq!(digest.as_array().map(Vec::len), Some(0));
    }
}
