//! Compact record digest handed to an external narrative summarizer.
//!
//! The summarizer itself lives outside this workspace. This module only
//! builds the JSON payload it consumes: the most recent records, flattened,
//! with short field names and RFC 3339 timestamps.

use chrono::SecondsFormat;
use serde_json::{json, Value};

use chainguard_contracts::ledger::Block;

use crate::window::flatten;

/// Number of records included when the caller has no preference.
pub const DEFAULT_DIGEST_LIMIT: usize = 50;

/// The last `limit` records of `ledger` as a JSON array, oldest first.
pub fn narrative_digest(ledger: &[Block], limit: usize) -> Value {
    let records = flatten(ledger);
    let start = records.len().saturating_sub(limit);

    let entries: Vec<Value> = records[start..]
        .iter()
        .map(|r| {
            json!({
                "time": r.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                "user": r.actor_id,
                "ip": r.source_address,
                "status": r.outcome.as_str(),
                "reason": r.reason,
                "action": r.action,
            })
        })
        .collect();

    Value::Array(entries)
}
