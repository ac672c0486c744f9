//! Scenario 3: Account Sharing
//!
//! The admin account logs in from three different networks within four
//! minutes, which trips SUSPICIOUS_USER. An older login from a fourth
//! address, ten minutes back, sits outside the window: it is scanned but
//! neither counted as a distinct address nor as a unique IP.

use chrono::{DateTime, Duration, Utc};

use chainguard_contracts::{error::ChainGuardResult, ledger::AccessStatus};

use crate::{
    config::RuntimeConfig,
    mock_data::scripted_record,
    scenarios::{print_outcome, run_pipeline, ScenarioOutcome},
};

pub const SHARED_ACTOR: &str = "sys_admin_01";
pub const RECENT_ADDRESSES: [&str; 3] = ["192.168.1.10", "172.16.254.1", "203.0.113.42"];
pub const STALE_ADDRESS: &str = "10.0.0.55";

/// Run Scenario 3 as of `now`.
pub fn run_scenario(now: DateTime<Utc>, config: &RuntimeConfig) -> ChainGuardResult<ScenarioOutcome> {
    println!("=== Scenario 3: Account Sharing ===");
    println!();
    println!("  Actor:   {}", SHARED_ACTOR);
    println!("  Recent:  {}", RECENT_ADDRESSES.join(", "));
    println!("  Stale:   {} (10 minutes ago, outside the window)", STALE_ADDRESS);
    println!();

    let mut records = vec![scripted_record(
        now - Duration::minutes(10),
        SHARED_ACTOR,
        STALE_ADDRESS,
        AccessStatus::Granted,
        None,
    )];
    for (i, address) in RECENT_ADDRESSES.iter().enumerate() {
        records.push(scripted_record(
            now - Duration::seconds(240 - 80 * i as i64),
            SHARED_ACTOR,
            address,
            AccessStatus::Granted,
            None,
        ));
    }

    let outcome = run_pipeline(records, now, config)?;
    print_outcome(&outcome);

    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(outcome)
}
