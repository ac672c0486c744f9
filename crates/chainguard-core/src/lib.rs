//! # chainguard-core
//!
//! Trait seams and orchestration for the ChainGuard runtime.
//!
//! This crate provides:
//! - The three core traits (`Clock`, `LedgerWriter`, `ThreatAnalyzer`)
//! - The `Monitor` that drives a ledger and an analyzer from one clock
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chainguard_core::{Monitor, traits::{FixedClock, LedgerWriter, ThreatAnalyzer}};
//! ```

pub mod monitor;
pub mod traits;

pub use monitor::Monitor;
