//! Core domain types for the Fellowship report.

use serde::{Deserialize, Serialize};

pub type Balance = u128;
pub type Rank = u16;

/// Sentinel returned whenever an account's display name cannot be resolved.
pub const DISPLAY_NAME_MISSING: &str = "Display Name Missing";

/// The chains a report run talks to - exhaustive match required (no default case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainRole {
    /// Relay chain holding account balances.
    Relay,
    /// People chain holding identities.
    People,
    /// Collectives chain holding the Fellowship.
    Collectives,
    /// Test network used for the account record diagnostic.
    TestNet,
}

/// SS58 prefix for rendering addresses. Polkadot system parachains share the
/// relay chain's format.
pub const POLKADOT_SS58_PREFIX: u16 = 0;

impl ChainRole {
    /// Returns all roles in bootstrap order.
    pub fn all() -> &'static [ChainRole] {
        &[
            ChainRole::Relay,
            ChainRole::People,
            ChainRole::Collectives,
            ChainRole::TestNet,
        ]
    }
}

impl std::fmt::Display for ChainRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainRole::Relay => write!(f, "Relay chain"),
            ChainRole::People => write!(f, "People chain"),
            ChainRole::Collectives => write!(f, "Collectives chain"),
            ChainRole::TestNet => write!(f, "Test network"),
        }
    }
}

/// Balance components of `System.Account`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub free: Balance,
    pub reserved: Balance,
    pub frozen: Balance,
}

impl AccountBalance {
    /// Spendable plus reserved balance.
    ///
    /// Returns `None` if the sum does not fit in a `u128`.
    pub fn total(&self) -> Option<Balance> {
        self.free.checked_add(self.reserved)
    }
}

/// Full `System.Account` record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub nonce: u32,
    pub consumers: u32,
    pub providers: u32,
    pub sufficients: u32,
    pub data: AccountBalance,
}

/// On-chain identity resolved for an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Display name from the identity (or `parent/sub` for sub-accounts).
    pub display_name: Option<String>,
    /// Sub-identity name if this is a sub-account.
    pub sub_identity: Option<String>,
}

impl Identity {
    /// The display name, if populated with non-blank text.
    pub fn populated_display_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// An entry of the membership map as enumerated, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMember {
    /// SS58 address decoded from the storage key.
    pub address: Option<String>,
    /// Rank decoded from the storage value.
    pub rank: Option<Rank>,
}

impl RawMember {
    pub fn new(address: Option<&str>, rank: Option<Rank>) -> Self {
        Self {
            address: address.map(str::to_string),
            rank,
        }
    }
}

/// A validated member of the ranked collective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub address: String,
    pub rank: Rank,
}
