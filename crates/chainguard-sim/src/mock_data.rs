//! Simulated identities, addresses, and access traffic.
//!
//! All identities and addresses here are fictional. The simulator stands in
//! for the network edge that would feed the ledger in a real deployment; the
//! identity portal stands in for a manual login form.

use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use uuid::Uuid;

use chainguard_contracts::ledger::{AccessRecord, AccessStatus};

// ── Identities & addresses ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
    Guest,
}

/// A known account and whether it may access the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: &'static str,
    pub name: &'static str,
    pub role: Role,
    pub authorized: bool,
}

pub const MOCK_IDENTITIES: [Identity; 4] = [
    Identity { id: "sys_admin_01", name: "System Admin", role: Role::Admin, authorized: true },
    Identity { id: "net_eng_04", name: "Network Engineer", role: Role::User, authorized: true },
    Identity { id: "guest_user_a", name: "Guest A", role: Role::Guest, authorized: false },
    Identity { id: "unknown_proxy", name: "Unknown", role: Role::Guest, authorized: false },
];

pub const MOCK_ADDRESSES: [&str; 5] = [
    "192.168.1.10",
    "10.0.0.55",
    "172.16.254.1",
    "45.22.11.90",
    "203.0.113.42",
];

/// Actor used for the simulator's spoofed attempts.
pub const ATTACKER_ID: &str = "unknown_attacker";

/// Address every portal login originates from.
pub const PORTAL_ADDRESS: &str = "127.0.0.1";

pub fn find_identity(id: &str) -> Option<&'static Identity> {
    MOCK_IDENTITIES.iter().find(|identity| identity.id == id)
}

// ── Traffic simulator ─────────────────────────────────────────────────────────

/// Probability that a simulated attempt is a spoofed one.
const SUSPICIOUS_RATE: f64 = 0.1;

/// Gap between consecutive records of one burst.
const BURST_SPACING_MS: i64 = 500;

/// Random NETWORK_LOGIN traffic across the mock identities and addresses.
///
/// An attempt is DENIED when the identity is unauthorised or the attempt
/// was picked as spoofed; spoofed attempts are attributed to
/// `ATTACKER_ID`.
pub struct TrafficSimulator<R: Rng> {
    rng: R,
}

impl TrafficSimulator<StdRng> {
    /// A reproducible simulator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TrafficSimulator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// One simulated attempt stamped `at`.
    pub fn next_record(&mut self, at: DateTime<Utc>) -> AccessRecord {
        let identity = MOCK_IDENTITIES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(MOCK_IDENTITIES[0]);
        let address = MOCK_ADDRESSES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(MOCK_ADDRESSES[0]);
        let spoofed = self.rng.gen_bool(SUSPICIOUS_RATE);

        let (outcome, reason) = if spoofed {
            (AccessStatus::Denied, Some("Invalid Signature"))
        } else if !identity.authorized {
            (AccessStatus::Denied, Some("Unauthorized Identity"))
        } else {
            (AccessStatus::Granted, None)
        };

        let suffix: String = (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();

        AccessRecord {
            id: uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid().to_string(),
            timestamp: at,
            actor_id: if spoofed { ATTACKER_ID } else { identity.id }.to_string(),
            source_address: address.to_string(),
            action: "NETWORK_LOGIN".to_string(),
            outcome,
            reason: reason.map(str::to_string),
            signature: format!("sig_{}", suffix.to_lowercase()),
        }
    }

    /// `count` attempts, 500 ms apart, the first stamped `start`.
    pub fn burst(&mut self, count: usize, start: DateTime<Utc>) -> Vec<AccessRecord> {
        (0..count)
            .map(|i| self.next_record(start + Duration::milliseconds(BURST_SPACING_MS * i as i64)))
            .collect()
    }
}

// ── Identity portal ───────────────────────────────────────────────────────────

/// What the portal tells the person at the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalVerdict {
    pub granted: bool,
    pub message: &'static str,
}

/// Check `user_id` against the known identities and log the attempt.
///
/// An empty id is logged as `anonymous`. Only known, authorised identities
/// are GRANTED.
pub fn verify_identity(user_id: &str, at: DateTime<Utc>) -> (AccessRecord, PortalVerdict) {
    let user_id = user_id.trim();
    let granted = find_identity(user_id).map(|i| i.authorized).unwrap_or(false);

    let record = AccessRecord {
        id: Uuid::new_v4().to_string(),
        timestamp: at,
        actor_id: if user_id.is_empty() { "anonymous" } else { user_id }.to_string(),
        source_address: PORTAL_ADDRESS.to_string(),
        action: "MANUAL_PORTAL_LOGIN".to_string(),
        outcome: if granted { AccessStatus::Granted } else { AccessStatus::Denied },
        reason: (!granted).then(|| "Identity Verification Failed".to_string()),
        signature: format!("portal_{}", at.timestamp_millis()),
    };

    let verdict = if granted {
        PortalVerdict { granted, message: "Identity Verified. Access Granted." }
    } else {
        PortalVerdict { granted, message: "Identity Verification Failed. Access Denied." }
    };

    (record, verdict)
}

/// A scripted record for scenarios, with a fresh id and a derived signature.
pub fn scripted_record(
    at: DateTime<Utc>,
    actor: &str,
    address: &str,
    outcome: AccessStatus,
    reason: Option<&str>,
) -> AccessRecord {
    let id = Uuid::new_v4();
    AccessRecord {
        id: id.to_string(),
        timestamp: at,
        actor_id: actor.to_string(),
        source_address: address.to_string(),
        action: "NETWORK_LOGIN".to_string(),
        outcome,
        reason: reason.map(str::to_string),
        signature: format!("sig_{}", &id.simple().to_string()[..8]),
    }
}
