//! Data sources the report is assembled from.
//!
//! The live implementations are the typed chain clients in `queries`; any
//! other implementation (an in-memory fixture, a cached snapshot) can stand in
//! for them.

use crate::error::ChainError;
use async_trait::async_trait;
use fellows_core::{AccountInfo, Identity, RawMember};

/// Source of `System.Account` records.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Fetch the account record, `None` if the account has never been funded.
    async fn fetch_account(&self, address: &str) -> Result<Option<AccountInfo>, ChainError>;
}

/// Source of on-chain identities.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Fetch the identity registered for `address`, `None` if there is none.
    async fn fetch_identity(&self, address: &str) -> Result<Option<Identity>, ChainError>;
}

/// Source of ranked collective membership.
#[async_trait]
pub trait MembershipSource: Send + Sync {
    /// Enumerate every entry of the membership map.
    async fn fetch_member_entries(&self) -> Result<Vec<RawMember>, ChainError>;
}
