//! Combined runtime configuration for the simulator and the demo CLI.
//!
//! One TOML document carries an `[analysis]` table (see
//! `chainguard_analysis::AnalysisConfig`) and a `[ledger]` table (see
//! `chainguard_ledger::LedgerConfig`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use chainguard_analysis::AnalysisConfig;
use chainguard_contracts::error::{ChainGuardError, ChainGuardResult};
use chainguard_ledger::LedgerConfig;

/// The configuration shipped with the crate.
pub const DEFAULT_CONFIG: &str = include_str!("../config/chainguard.toml");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub analysis: AnalysisConfig,
    pub ledger: LedgerConfig,
}

impl RuntimeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> ChainGuardResult<Self> {
        let config: RuntimeConfig = toml::from_str(s).map_err(|e| ChainGuardError::ConfigError {
            reason: format!("failed to parse runtime TOML: {}", e),
        })?;
        config.analysis.validate()?;
        config.ledger.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ChainGuardResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ChainGuardError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The embedded `config/chainguard.toml`.
    pub fn embedded() -> ChainGuardResult<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }
}
