//! Detection thresholds and score contributions.
//!
//! An `AnalysisConfig` is deserialized from TOML. Every table and key is
//! optional; whatever is missing falls back to the built-in policy constants,
//! so an empty document yields `AnalysisConfig::default()`.
//!
//! Example:
//! ```toml
//! window_secs = 300
//!
//! [velocity]
//! max_requests = 5
//! score = 10
//!
//! [brute_force]
//! min_failures = 3
//! score = 25
//!
//! [suspicious_user]
//! max_addresses = 2
//! score = 15
//!
//! [levels]
//! critical = 75
//! high = 50
//! medium = 25
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};

use chainguard_contracts::{
    error::{ChainGuardError, ChainGuardResult},
    report::ThreatLevel,
};

/// Longest window `AnalysisConfig::window` will hand out.
const MAX_WINDOW_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// HIGH_VELOCITY: a source address with more than `max_requests` records in
/// the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityRule {
    pub max_requests: usize,
    pub score: u32,
}

impl Default for VelocityRule {
    fn default() -> Self {
        Self { max_requests: 5, score: 10 }
    }
}

/// BRUTE_FORCE: a source address with at least `min_failures` DENIED records
/// in the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BruteForceRule {
    pub min_failures: usize,
    pub score: u32,
}

impl Default for BruteForceRule {
    fn default() -> Self {
        Self { min_failures: 3, score: 25 }
    }
}

/// SUSPICIOUS_USER: an actor seen from more than `max_addresses` distinct
/// source addresses in the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspiciousUserRule {
    pub max_addresses: usize,
    pub score: u32,
}

impl Default for SuspiciousUserRule {
    fn default() -> Self {
        Self { max_addresses: 2, score: 15 }
    }
}

/// Score breakpoints for the overall threat level. A score must be strictly
/// greater than a breakpoint to reach its tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self { critical: 75, high: 50, medium: 25 }
    }
}

impl LevelThresholds {
    /// Map an accumulated (unclamped) score to its tier.
    pub fn level_for(&self, score: u32) -> ThreatLevel {
        if score > self.critical {
            ThreatLevel::Critical
        } else if score > self.high {
            ThreatLevel::High
        } else if score > self.medium {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Low
        }
    }
}

/// The top-level analysis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Length of the trailing detection window, in seconds.
    pub window_secs: u64,
    pub velocity: VelocityRule,
    pub brute_force: BruteForceRule,
    pub suspicious_user: SuspiciousUserRule,
    pub levels: LevelThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_secs: 5 * 60,
            velocity: VelocityRule::default(),
            brute_force: BruteForceRule::default(),
            suspicious_user: SuspiciousUserRule::default(),
            levels: LevelThresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> ChainGuardResult<Self> {
        let config: AnalysisConfig = toml::from_str(s).map_err(|e| ChainGuardError::ConfigError {
            reason: format!("failed to parse analysis TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The detection window as a `chrono::Duration`, capped at a century.
    pub fn window(&self) -> Duration {
        Duration::seconds(self.window_secs.min(MAX_WINDOW_SECS) as i64)
    }

    /// Reject configurations that cannot produce meaningful reports.
    pub fn validate(&self) -> ChainGuardResult<()> {
        if self.window_secs == 0 {
            return Err(ChainGuardError::ConfigError {
                reason: "window_secs must be greater than zero".to_string(),
            });
        }

        let levels = &self.levels;
        if !(levels.critical >= levels.high && levels.high >= levels.medium) {
            return Err(ChainGuardError::ConfigError {
                reason: format!(
                    "level breakpoints must satisfy critical >= high >= medium (got {} / {} / {})",
                    levels.critical, levels.high, levels.medium
                ),
            });
        }

        Ok(())
    }
}
