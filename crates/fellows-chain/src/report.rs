//! Joins member balances and identities into report rows.

use crate::error::ChainError;
use crate::queries::account::get_balance;
use crate::queries::identity::get_display_name;
use crate::source::{AccountSource, IdentitySource};
use fellows_core::{MembershipRecord, ReportRow};

/// Build one row per member, in member order.
///
/// Members are looked up `batch_size` at a time; within a batch every
/// balance and identity query runs concurrently. Any balance failure fails
/// the whole report. Identity failures only blank the name.
pub async fn build_report<B, I>(
    balances: &B,
    identities: &I,
    members: &[MembershipRecord],
    batch_size: usize,
) -> Result<Vec<ReportRow>, ChainError>
where
    B: AccountSource + ?Sized,
    I: IdentitySource + ?Sized,
{
    let batch_size = batch_size.max(1);
    let total_batches = members.len().div_ceil(batch_size);
    let mut rows = Vec::with_capacity(members.len());

    for (batch_num, chunk) in members.chunks(batch_size).enumerate() {
        tracing::info!(
            "Fetching member batch {}/{} ({} members)...",
            batch_num + 1,
            total_batches,
            chunk.len()
        );

        let futures: Vec<_> = chunk
            .iter()
            .map(|member| build_row(balances, identities, member))
            .collect();

        // try_join_all keeps input order regardless of completion order
        let batch = futures::future::try_join_all(futures).await?;
        rows.extend(batch);
    }

    Ok(rows)
}

async fn build_row<B, I>(
    balances: &B,
    identities: &I,
    member: &MembershipRecord,
) -> Result<ReportRow, ChainError>
where
    B: AccountSource + ?Sized,
    I: IdentitySource + ?Sized,
{
    let (balance, display_name) = futures::future::join(
        get_balance(balances, &member.address),
        get_display_name(identities, &member.address),
    )
    .await;

    Ok(ReportRow {
        address: member.address.clone(),
        rank: member.rank,
        display_name,
        balance: balance?,
    })
}
