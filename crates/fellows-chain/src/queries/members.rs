//! Ranked collective membership from the Collectives chain.

use crate::client::ChainConnection;
use crate::error::ChainError;
use crate::source::MembershipSource;
use crate::ss58::{account_from_key, encode_ss58};
use async_trait::async_trait;
use fellows_core::{MembershipRecord, POLKADOT_SS58_PREFIX, Rank, RawMember, rank_members};
use subxt::dynamic::{At, DecodedValueThunk, Value};

/// Pallet instance holding the Polkadot Technical Fellowship.
pub const FELLOWSHIP_PALLET: &str = "FellowshipCollective";

/// Collectives chain client for membership queries.
#[derive(Debug)]
pub struct CollectivesChainClient {
    connection: ChainConnection,
}

impl CollectivesChainClient {
    /// Wrap an open connection to a Collectives chain.
    pub fn new(connection: ChainConnection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &ChainConnection {
        &self.connection
    }

    pub fn into_connection(self) -> ChainConnection {
        self.connection
    }

    async fn enumerate_members(&self) -> Result<Vec<RawMember>, ChainError> {
        let storage_query = subxt::dynamic::storage(FELLOWSHIP_PALLET, "Members", ());

        let mut members = Vec::new();
        let mut iter = self
            .connection
            .client()
            .storage()
            .at_latest()
            .await?
            .iter(storage_query)
            .await?;

        while let Some(result) = iter.next().await {
            let kv = result?;
            let value: DecodedValueThunk = kv.value;

            let record = match value.to_value() {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::debug!("Undecodable member record: {}", e);
                    None
                }
            };

            members.push(decode_member_entry(&kv.key_bytes, record.as_ref()));
        }

        tracing::debug!("Enumerated {} {} entries", members.len(), FELLOWSHIP_PALLET);
        Ok(members)
    }
}

#[async_trait]
impl MembershipSource for CollectivesChainClient {
    async fn fetch_member_entries(&self) -> Result<Vec<RawMember>, ChainError> {
        self.connection.run_query(self.enumerate_members()).await
    }
}

/// One `Members` entry: account from the key, rank from the record.
fn decode_member_entry(key_bytes: &[u8], record: Option<&Value<u32>>) -> RawMember {
    // Key format: prefix + twox64 hash + account (32 bytes)
    let address =
        account_from_key(key_bytes).map(|account| encode_ss58(&account, POLKADOT_SS58_PREFIX));

    // MemberRecord = { rank: u16 }
    let rank = record.and_then(decode_rank);

    RawMember { address, rank }
}

fn decode_rank(decoded: &Value<u32>) -> Option<Rank> {
    let rank = decoded
        .at("rank")
        .and_then(|v: &Value<u32>| v.as_u128())
        .or_else(|| decoded.as_u128())?;
    Rank::try_from(rank).ok()
}

/// All valid members, most senior first.
pub async fn get_members<S>(source: &S) -> Result<Vec<MembershipRecord>, ChainError>
where
    S: MembershipSource + ?Sized,
{
    let raw = source.fetch_member_entries().await?;
    let total = raw.len();
    let members = rank_members(raw);

    if members.len() < total {
        tracing::warn!(
            "Dropped {} incomplete membership entries",
            total - members.len()
        );
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub(Result<Vec<RawMember>, &'static str>);

    #[async_trait]
    impl MembershipSource for Stub {
        async fn fetch_member_entries(&self) -> Result<Vec<RawMember>, ChainError> {
            self.0
                .clone()
                .map_err(|e| ChainError::Storage(e.to_string()))
        }
    }

    #[tokio::test]
    async fn test_get_members_filters_and_sorts() {
        let stub = Stub(Ok(vec![
            RawMember::new(Some("addr1"), None),
            RawMember::new(Some("addr2"), Some(5)),
            RawMember::new(None, Some(3)),
            RawMember::new(Some("addr3"), Some(8)),
        ]));

        let members = get_members(&stub).await.unwrap();
        assert_eq!(
            members,
            vec![
                MembershipRecord {
                    address: "addr3".into(),
                    rank: 8
                },
                MembershipRecord {
                    address: "addr2".into(),
                    rank: 5
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_get_members_fails_atomically() {
        let stub = Stub(Err("iteration aborted"));
        assert!(matches!(
            get_members(&stub).await,
            Err(ChainError::Storage(_))
        ));
    }

    #[test]
    fn test_decode_member_entry() {
        let account = crate::ss58::parse_address("15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5")
            .unwrap();
        let mut key = vec![0xAB; 40];
        key.extend_from_slice(&account.0);
        let record = Value::named_composite([("rank", Value::u128(3))]).map_context(|_| 0u32);

        assert_eq!(
            decode_member_entry(&key, Some(&record)),
            RawMember::new(Some("15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5"), Some(3))
        );
    }

    #[test]
    fn test_decode_member_entry_incomplete() {
        let record = Value::named_composite([("rank", Value::u128(1))]).map_context(|_| 0u32);
        assert_eq!(
            decode_member_entry(&[0u8; 8], Some(&record)),
            RawMember::new(None, Some(1))
        );

        let entry = decode_member_entry(&[0x11; 72], None);
        assert!(entry.address.is_some());
        assert_eq!(entry.rank, None);
    }

    #[test]
    fn test_decode_rank_record() {
        let record = Value::named_composite([("rank", Value::u128(6))]);
        assert_eq!(decode_rank(&record.map_context(|_| 0u32)), Some(6));
    }

    #[test]
    fn test_decode_rank_bare_and_invalid() {
        assert_eq!(decode_rank(&Value::u128(3).map_context(|_| 0u32)), Some(3));
        assert_eq!(
            decode_rank(&Value::u128(u128::from(u16::MAX) + 1).map_context(|_| 0u32)),
            None
        );
        assert_eq!(
            decode_rank(&Value::string("senior").map_context(|_| 0u32)),
            None
        );
    }
}
