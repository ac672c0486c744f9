//! Access records and the blocks that batch them.
//!
//! Both types are produced outside the analysis engine (by the traffic
//! simulator, the identity portal, and the ledger) and are only read by it.
//! JSON field names follow the dashboard's camelCase shape; the legacy names
//! (`userId`, `ipAddress`, `status`, `data`) are accepted on input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one access attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessStatus {
    Granted,
    Denied,
    Pending,
}

impl AccessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStatus::Granted => "GRANTED",
            AccessStatus::Denied => "DENIED",
            AccessStatus::Pending => "PENDING",
        }
    }
}

impl std::fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One logged attempt to use a resource.
///
/// Records are never modified after creation. The `signature` is carried
/// through the ledger but nothing in the runtime validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRecord {
    /// Opaque unique identifier (UUID v4 for simulated traffic).
    pub id: String,

    /// Instant of occurrence, serialized as milliseconds since the epoch.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// User or pseudo-anonymous actor identity.
    #[serde(alias = "userId")]
    pub actor_id: String,

    /// Originating network address, as a plain string.
    #[serde(alias = "ipAddress")]
    pub source_address: String,

    /// Free-form label of the attempted operation (e.g. "NETWORK_LOGIN").
    pub action: String,

    #[serde(alias = "status")]
    pub outcome: AccessStatus,

    /// Why the outcome was reached; typically present on denials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub signature: String,
}

impl AccessRecord {
    pub fn is_denied(&self) -> bool {
        self.outcome == AccessStatus::Denied
    }
}

/// A batch of access records sealed together.
///
/// `previous_hash`, `hash` and `nonce` link blocks into a chain. The
/// analysis engine never reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Zero-based position in the ledger. Index 0 is the genesis block.
    pub index: u64,

    /// Instant the block was sealed.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Records in creation order.
    #[serde(alias = "data", default)]
    pub records: Vec<AccessRecord>,

    pub previous_hash: String,

    pub hash: String,

    #[serde(default)]
    pub nonce: u64,
}

impl Block {
    /// Hash sentinel carried by the genesis block.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";

    /// `previous_hash` of the genesis block. It links to nothing.
    pub const GENESIS_PREVIOUS_HASH: &'static str = "0";

    /// Build the immutable genesis block: index 0, no records.
    pub fn genesis(timestamp: DateTime<Utc>) -> Self {
        Self {
            index: 0,
            timestamp,
            records: Vec::new(),
            previous_hash: Self::GENESIS_PREVIOUS_HASH.to_string(),
            hash: Self::GENESIS_HASH.to_string(),
            nonce: 0,
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}
