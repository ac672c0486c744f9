//! Scenario 1: Brute Force
//!
//! A spoofed actor hammers the gateway from a single address. Seven denied
//! attempts inside the window trip both BRUTE_FORCE (HIGH) and HIGH_VELOCITY
//! (MEDIUM) on that address, while an admin's normal logins from the office
//! network stay clean.

use chrono::{DateTime, Duration, Utc};

use chainguard_contracts::{error::ChainGuardResult, ledger::AccessStatus};

use crate::{
    config::RuntimeConfig,
    mock_data::{scripted_record, ATTACKER_ID},
    scenarios::{print_outcome, run_pipeline, ScenarioOutcome},
};

pub const ATTACK_ADDRESS: &str = "45.22.11.90";

/// Run Scenario 1 as of `now`.
pub fn run_scenario(now: DateTime<Utc>, config: &RuntimeConfig) -> ChainGuardResult<ScenarioOutcome> {
    println!("=== Scenario 1: Brute Force ===");
    println!();
    println!("  Attacker: {} from {} (7 attempts, all denied)", ATTACKER_ID, ATTACK_ADDRESS);
    println!("  Baseline: sys_admin_01 from 192.168.1.10 (2 attempts, granted)");
    println!();

    let mut records = Vec::new();
    for i in 0..7 {
        records.push(scripted_record(
            now - Duration::seconds(120 - i * 10),
            ATTACKER_ID,
            ATTACK_ADDRESS,
            AccessStatus::Denied,
            Some("Invalid Signature"),
        ));
    }
    records.push(scripted_record(
        now - Duration::seconds(90),
        "sys_admin_01",
        "192.168.1.10",
        AccessStatus::Granted,
        None,
    ));
    records.push(scripted_record(
        now - Duration::seconds(30),
        "sys_admin_01",
        "192.168.1.10",
        AccessStatus::Granted,
        None,
    ));

    let outcome = run_pipeline(records, now, config)?;
    print_outcome(&outcome);

    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(outcome)
}
