//! # chainguard-contracts
//!
//! Shared types for the ChainGuard access-ledger runtime.
//!
//! Every crate in the workspace imports from here. No business logic lives
//! in this crate: only the ledger data model, the threat report model, and
//! the error type.

pub mod error;
pub mod ledger;
pub mod report;

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use error::ChainGuardError;
    use ledger::{AccessRecord, AccessStatus, Block};
    use report::{AnomalyKind, ReportStats, ThreatLevel};

    // ── Ledger shapes ────────────────────────────────────────────────────────

    #[test]
    fn genesis_block_is_empty_and_linked_to_nothing() {
        let genesis = Block::genesis(Utc.timestamp_millis_opt(1_000).unwrap());
        assert_eq!(genesis.index, 0);
        assert!(genesis.records.is_empty());
        assert!(genesis.is_genesis());
        assert_eq!(genesis.previous_hash, "0");
        assert_eq!(genesis.hash.len(), 64);
        assert!(genesis.hash.chars().all(|c| c == '0'));
    }

    /// Blocks exported by the browser dashboard use `data`, `userId`,
    /// `ipAddress` and `status`; they must still load.
    #[test]
    fn block_accepts_dashboard_field_names() {
        let raw = json!({
            "index": 1,
            "timestamp": 1_700_000_000_000i64,
            "data": [{
                "id": "a1",
                "timestamp": 1_700_000_000_500i64,
                "userId": "net_eng_04",
                "ipAddress": "10.0.0.55",
                "action": "NETWORK_LOGIN",
                "status": "DENIED",
                "reason": "Firewall Block",
                "signature": "sig_x"
            }],
            "previousHash": "0000",
            "hash": "0abc",
            "nonce": 7
        });

        let block: Block = serde_json::from_value(raw).unwrap();
        assert_eq!(block.records.len(), 1);
        let record = &block.records[0];
        assert_eq!(record.actor_id, "net_eng_04");
        assert_eq!(record.source_address, "10.0.0.55");
        assert_eq!(record.outcome, AccessStatus::Denied);
        assert_eq!(record.reason.as_deref(), Some("Firewall Block"));
        assert_eq!(record.timestamp.timestamp_millis(), 1_700_000_000_500);
    }

    #[test]
    fn record_without_reason_omits_the_field() {
        let record = AccessRecord {
            id: "r1".to_string(),
            timestamp: Utc.timestamp_millis_opt(42).unwrap(),
            actor_id: "sys_admin_01".to_string(),
            source_address: "192.168.1.10".to_string(),
            action: "NETWORK_LOGIN".to_string(),
            outcome: AccessStatus::Granted,
            reason: None,
            signature: "sig_a".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("reason").is_none());
        assert_eq!(value["actorId"], "sys_admin_01");
        assert_eq!(value["outcome"], "GRANTED");
        assert_eq!(value["timestamp"], 42);
    }

    // ── Report shapes ────────────────────────────────────────────────────────

    #[test]
    fn threat_levels_are_ordered() {
        assert!(ThreatLevel::Low < ThreatLevel::Medium);
        assert!(ThreatLevel::Medium < ThreatLevel::High);
        assert!(ThreatLevel::High < ThreatLevel::Critical);
    }

    #[test]
    fn anomaly_kind_serializes_as_screaming_case() {
        let json = serde_json::to_string(&AnomalyKind::SuspiciousUser).unwrap();
        assert_eq!(json, "\"SUSPICIOUS_USER\"");
        assert_eq!(AnomalyKind::PolicyViolation.to_string(), "POLICY_VIOLATION");
    }

    #[test]
    fn report_stats_use_dashboard_field_names() {
        let stats = ReportStats {
            total_scanned: 12,
            suspicious_count: 2,
            unique_ips: 4,
        };
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["totalScanned"], 12);
        assert_eq!(value["suspiciousCount"], 2);
        assert_eq!(value["uniqueIPs"], 4);
    }

    // ── ChainGuardError display messages ─────────────────────────────────────

    #[test]
    fn error_config_error_display() {
        let err = ChainGuardError::ConfigError {
            reason: "window_secs must be positive".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("window_secs"));
    }

    #[test]
    fn error_chain_integrity_display() {
        let err = ChainGuardError::ChainIntegrity {
            index: 3,
            reason: "hash mismatch".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("block 3"));
        assert!(msg.contains("hash mismatch"));
    }
}
