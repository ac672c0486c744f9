//! ChainGuard — Access Ledger Threat Analysis Demo CLI
//!
//! Runs the scripted scenarios, or analyzes, verifies, and digests ledger
//! files exported as JSON block arrays.
//!
//! Usage:
//!   cargo run -p demo -- scenario all
//!   cargo run -p demo -- simulate --out ledger.json --bursts 6
//!   cargo run -p demo -- analyze --ledger ledger.json --json
//!   cargo run -p demo -- verify --ledger ledger.json
//!   cargo run -p demo -- digest --ledger ledger.json --limit 20

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chainguard_analysis::{narrative_digest, HeuristicEngine, DEFAULT_DIGEST_LIMIT};
use chainguard_contracts::error::{ChainGuardError, ChainGuardResult};
use chainguard_core::traits::{Clock, FixedClock, LedgerWriter, SystemClock};
use chainguard_ledger::{check_chain, read_ledger, write_ledger, InMemoryLedger};
use chainguard_sim::{
    mock_data::TrafficSimulator,
    scenarios::{
        self, account_sharing, brute_force, print_report, random_traffic, traffic_burst,
    },
    RuntimeConfig,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Access-ledger threat analysis demo.
#[derive(Parser)]
#[command(
    name = "chainguard",
    about = "ChainGuard access-ledger threat analysis demo",
    long_about = "Simulates an append-only access-log ledger and runs the heuristic\n\
                  threat engine (velocity, brute force, multi-IP accounts) over it."
)]
struct Cli {
    /// Runtime configuration TOML; the embedded defaults are used when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one or all scripted scenarios.
    Scenario {
        #[arg(value_enum)]
        name: ScenarioName,
        /// Seed for the random-traffic scenario.
        #[arg(long, default_value_t = random_traffic::DEFAULT_SEED)]
        seed: u64,
    },
    /// Generate simulated traffic, seal it into a ledger, and write it out.
    Simulate {
        #[arg(long)]
        out: PathBuf,
        /// Number of 3-record bursts, spread over the last few minutes.
        #[arg(long, default_value_t = 5)]
        bursts: u32,
        #[arg(long, default_value_t = random_traffic::DEFAULT_SEED)]
        seed: u64,
    },
    /// Analyze a ledger file and print the threat report.
    Analyze {
        #[arg(long)]
        ledger: PathBuf,
        /// Analyze as of this instant (ms since epoch) instead of now.
        #[arg(long)]
        at: Option<i64>,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check block linkage and hashes of a ledger file.
    Verify {
        #[arg(long)]
        ledger: PathBuf,
    },
    /// Print the recent-record digest handed to a narrative summarizer.
    Digest {
        #[arg(long)]
        ledger: PathBuf,
        #[arg(long, default_value_t = DEFAULT_DIGEST_LIMIT)]
        limit: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScenarioName {
    All,
    BruteForce,
    TrafficBurst,
    AccountSharing,
    RandomTraffic,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("chainguard error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> ChainGuardResult<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Scenario { name, seed } => run_scenario(name, seed, &config),
        Command::Simulate { out, bursts, seed } => simulate(&out, bursts, seed, &config),
        Command::Analyze { ledger, at, json } => analyze(&ledger, at, json, &config),
        Command::Verify { ledger } => verify(&ledger),
        Command::Digest { ledger, limit } => digest(&ledger, limit),
    }
}

fn load_config(path: Option<&Path>) -> ChainGuardResult<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::from_file(path),
        None => RuntimeConfig::embedded(),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_scenario(name: ScenarioName, seed: u64, config: &RuntimeConfig) -> ChainGuardResult<()> {
    print_banner();
    let now = SystemClock.now();

    match name {
        ScenarioName::All => scenarios::run_all(now, config)?,
        ScenarioName::BruteForce => {
            brute_force::run_scenario(now, config)?;
        }
        ScenarioName::TrafficBurst => {
            traffic_burst::run_scenario(now, config)?;
        }
        ScenarioName::AccountSharing => {
            account_sharing::run_scenario(now, config)?;
        }
        ScenarioName::RandomTraffic => {
            random_traffic::run_scenario(now, config, seed)?;
        }
    }

    println!("All selected scenarios completed successfully.");
    Ok(())
}

fn simulate(out: &Path, bursts: u32, seed: u64, config: &RuntimeConfig) -> ChainGuardResult<()> {
    let now = SystemClock.now();
    let ledger = InMemoryLedger::new(config.ledger.clone(), now - Duration::minutes(30));
    let mut simulator = TrafficSimulator::seeded(seed);

    for burst in 0..i64::from(bursts) {
        let start = now - Duration::seconds(30 * (i64::from(bursts) - burst));
        for record in simulator.burst(3, start) {
            ledger.submit(record)?;
        }
    }
    let sealed = ledger.seal_all(now)?;
    write_ledger(out, &ledger.snapshot())?;

    info!(path = %out.display(), blocks = sealed.len(), "simulated ledger written");
    println!(
        "Wrote {} block(s) ({} sealed from {} burst(s)) to {}",
        ledger.height(),
        sealed.len(),
        bursts,
        out.display()
    );
    Ok(())
}

fn analyze(path: &Path, at: Option<i64>, json: bool, config: &RuntimeConfig) -> ChainGuardResult<()> {
    let blocks = read_ledger(path)?;
    let clock: Box<dyn Clock> = match at {
        Some(ms) => Box::new(FixedClock::new(instant_from_millis(ms)?)),
        None => Box::new(SystemClock),
    };

    let engine = HeuristicEngine::new(config.analysis.clone());
    let report = engine.analyze(&blocks, clock.now());

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|e| {
            ChainGuardError::LedgerFormat {
                reason: format!("failed to serialize report: {}", e),
            }
        })?;
        println!("{}", rendered);
    } else {
        println!("Threat report for {} ({} block(s))", path.display(), blocks.len());
        print_report(&report);
    }
    Ok(())
}

fn verify(path: &Path) -> ChainGuardResult<()> {
    let blocks = read_ledger(path)?;
    check_chain(&blocks)?;
    println!("Ledger {} VERIFIED ({} block(s))", path.display(), blocks.len());
    Ok(())
}

fn digest(path: &Path, limit: usize) -> ChainGuardResult<()> {
    let blocks = read_ledger(path)?;
    let digest = narrative_digest(&blocks, limit);
    let rendered = serde_json::to_string_pretty(&digest).map_err(|e| ChainGuardError::LedgerFormat {
        reason: format!("failed to serialize digest: {}", e),
    })?;
    println!("{}", rendered);
    Ok(())
}

fn instant_from_millis(ms: i64) -> ChainGuardResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| ChainGuardError::ConfigError {
            reason: format!("--at {} is not a representable instant", ms),
        })
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("ChainGuard — Access Ledger Threat Analysis");
    println!("==========================================");
    println!();
    println!("Pipeline per scenario:");
    println!("  [1] Access records queued on the ledger");
    println!("  [2] Records sealed into SHA-256 linked blocks (max 5 per block)");
    println!("  [3] Heuristic engine scans the last 5 minutes of records");
    println!("  [4] Rules: HIGH_VELOCITY (>5 req), BRUTE_FORCE (>=3 denied), SUSPICIOUS_USER (>2 IPs)");
    println!("  [5] Score summed, tier assigned, HIGH severity listed first");
    println!();
}
