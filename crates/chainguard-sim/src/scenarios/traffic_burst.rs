//! Scenario 2: Traffic Burst
//!
//! An authorised engineer's automation floods the gateway: eight granted
//! logins from one address within a minute. Nothing is denied, so only
//! HIGH_VELOCITY fires.

use chrono::{DateTime, Duration, Utc};

use chainguard_contracts::{error::ChainGuardResult, ledger::AccessStatus};

use crate::{
    config::RuntimeConfig,
    mock_data::scripted_record,
    scenarios::{print_outcome, run_pipeline, ScenarioOutcome},
};

pub const BURST_ACTOR: &str = "net_eng_04";
pub const BURST_ADDRESS: &str = "10.0.0.55";
pub const BURST_SIZE: i64 = 8;

/// Run Scenario 2 as of `now`.
pub fn run_scenario(now: DateTime<Utc>, config: &RuntimeConfig) -> ChainGuardResult<ScenarioOutcome> {
    println!("=== Scenario 2: Traffic Burst ===");
    println!();
    println!("  Actor: {} from {} ({} granted logins in 56s)", BURST_ACTOR, BURST_ADDRESS, BURST_SIZE);
    println!();

    let records = (0..BURST_SIZE)
        .map(|i| {
            scripted_record(
                now - Duration::seconds(60 - i * 8),
                BURST_ACTOR,
                BURST_ADDRESS,
                AccessStatus::Granted,
                None,
            )
        })
        .collect();

    let outcome = run_pipeline(records, now, config)?;
    print_outcome(&outcome);

    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(outcome)
}
