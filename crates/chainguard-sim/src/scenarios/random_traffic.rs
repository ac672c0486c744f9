//! Scenario 4: Random Traffic
//!
//! Seeded background traffic from the simulator plus two identity-portal
//! logins, one for a known engineer and one for an unknown id. The outcome
//! depends on the seed; the run is reproducible for a fixed seed and `now`.

use chrono::{DateTime, Duration, Utc};

use chainguard_contracts::error::ChainGuardResult;

use crate::{
    config::RuntimeConfig,
    mock_data::{verify_identity, TrafficSimulator},
    scenarios::{print_outcome, run_pipeline, ScenarioOutcome},
};

pub const DEFAULT_SEED: u64 = 0x00C4_A16E;

/// Bursts of simulated traffic, and records per burst.
const BURSTS: i64 = 4;
const BURST_SIZE: usize = 3;

/// Run Scenario 4 as of `now` with the given simulator seed.
pub fn run_scenario(
    now: DateTime<Utc>,
    config: &RuntimeConfig,
    seed: u64,
) -> ChainGuardResult<ScenarioOutcome> {
    println!("=== Scenario 4: Random Traffic ===");
    println!();
    println!("  Simulator seed: {:#x} ({} bursts of {})", seed, BURSTS, BURST_SIZE);

    let mut simulator = TrafficSimulator::seeded(seed);
    let mut records = Vec::new();
    for burst in 0..BURSTS {
        let start = now - Duration::seconds(200 - burst * 40);
        records.extend(simulator.burst(BURST_SIZE, start));
    }

    for user_id in ["net_eng_04", "intruder_99"] {
        let (record, verdict) = verify_identity(user_id, now - Duration::seconds(15));
        println!("  Portal login {:<12} {}", user_id, verdict.message);
        records.push(record);
    }
    println!();

    let outcome = run_pipeline(records, now, config)?;
    print_outcome(&outcome);

    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(outcome)
}
