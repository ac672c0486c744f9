//! # chainguard-sim
//!
//! Record producers and demo scenarios for the ChainGuard access ledger.
//!
//! Demonstrates the threat engine on four traffic patterns:
//!
//! 1. **Brute Force** — repeated denied attempts from one address.
//! 2. **Traffic Burst** — a flood of granted logins from one address.
//! 3. **Account Sharing** — one account from several networks, with an
//!    older login outside the analysis window.
//! 4. **Random Traffic** — seeded simulator output plus identity-portal
//!    logins.
//!
//! All identities and addresses are fictional.

pub mod config;
pub mod mock_data;
pub mod scenarios;

pub use config::RuntimeConfig;
