//! Record extraction, windowing, and grouping.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use chainguard_contracts::ledger::{AccessRecord, Block};

/// Records sharing one key (a source address or an actor), sorted by time.
#[derive(Debug)]
pub(crate) struct Group<'a> {
    pub key: &'a str,
    pub records: Vec<&'a AccessRecord>,
}

/// Every record in the ledger, in block order then intra-block order.
pub(crate) fn flatten(ledger: &[Block]) -> Vec<&AccessRecord> {
    ledger.iter().flat_map(|block| block.records.iter()).collect()
}

/// Records stamped strictly after `now - window`.
///
/// Records stamped after `now` are kept.
pub(crate) fn within_window<'a>(
    records: &[&'a AccessRecord],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<&'a AccessRecord> {
    match now.checked_sub_signed(window) {
        Some(cutoff) => records
            .iter()
            .copied()
            .filter(|r| r.timestamp > cutoff)
            .collect(),
        None => records.to_vec(),
    }
}

/// Group `records` by `key`, keeping groups in first-appearance order.
///
/// Within a group records keep extraction order and are then stable-sorted
/// by timestamp, so equal timestamps stay in extraction order.
pub(crate) fn group_by<'a, F>(records: &[&'a AccessRecord], key: F) -> Vec<Group<'a>>
where
    F: Fn(&'a AccessRecord) -> &'a str,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for &record in records {
        let k = key(record);
        let slot = *positions.entry(k).or_insert_with(|| {
            groups.push(Group { key: k, records: Vec::new() });
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }

    for group in &mut groups {
        group.records.sort_by_key(|r| r.timestamp);
    }

    groups
}
