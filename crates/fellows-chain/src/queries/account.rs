//! Account balance queries on the relay chain.

use crate::client::ChainConnection;
use crate::error::ChainError;
use crate::source::AccountSource;
use crate::ss58::parse_address;
use async_trait::async_trait;
use fellows_core::{AccountBalance, AccountInfo, Balance};
use subxt::dynamic::{At, DecodedValueThunk, Value};

/// Relay chain client for account queries.
#[derive(Debug)]
pub struct RelayChainClient {
    connection: ChainConnection,
}

impl RelayChainClient {
    /// Wrap an open connection to a relay chain (or any chain with `System.Account`).
    pub fn new(connection: ChainConnection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &ChainConnection {
        &self.connection
    }

    pub fn into_connection(self) -> ChainConnection {
        self.connection
    }

    async fn query_account(&self, address: &str) -> Result<Option<AccountInfo>, ChainError> {
        let account = parse_address(address)?;
        let storage_query =
            subxt::dynamic::storage("System", "Account", vec![Value::from_bytes(account)]);

        let result: Option<DecodedValueThunk> = self
            .connection
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            tracing::debug!("No System.Account record for {}", address);
            return Ok(None);
        };

        decode_account_info(&value.to_value()?).map(Some)
    }
}

#[async_trait]
impl AccountSource for RelayChainClient {
    async fn fetch_account(&self, address: &str) -> Result<Option<AccountInfo>, ChainError> {
        self.connection
            .run_query(self.query_account(address))
            .await
    }
}

/// Decode a `System.Account` record.
///
/// The balance fields must be present and numeric. The reference counters
/// fall back to zero.
fn decode_account_info(decoded: &Value<u32>) -> Result<AccountInfo, ChainError> {
    // AccountInfo = { nonce, consumers, providers, sufficients, data: AccountData }
    // AccountData = { free, reserved, frozen, flags }
    let data = decoded
        .at("data")
        .ok_or_else(|| ChainError::InvalidData("AccountInfo without data".into()))?;

    Ok(AccountInfo {
        nonce: counter_field(decoded, "nonce"),
        consumers: counter_field(decoded, "consumers"),
        providers: counter_field(decoded, "providers"),
        sufficients: counter_field(decoded, "sufficients"),
        data: AccountBalance {
            free: balance_field(data, "free")?,
            reserved: balance_field(data, "reserved")?,
            frozen: data
                .at("frozen")
                .and_then(|v: &Value<u32>| v.as_u128())
                .unwrap_or(0),
        },
    })
}

fn balance_field(data: &Value<u32>, name: &str) -> Result<Balance, ChainError> {
    data.at(name)
        .and_then(|v: &Value<u32>| v.as_u128())
        .ok_or_else(|| ChainError::InvalidData(format!("AccountData without numeric {}", name)))
}

fn counter_field(value: &Value<u32>, name: &str) -> u32 {
    value
        .at(name)
        .and_then(|v: &Value<u32>| v.as_u128())
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

/// Total of free and reserved balance for `address`.
///
/// An account with no stored record has a zero balance.
pub async fn get_balance<S>(source: &S, address: &str) -> Result<Balance, ChainError>
where
    S: AccountSource + ?Sized,
{
    let Some(info) = source.fetch_account(address).await? else {
        return Ok(0);
    };

    info.data.total().ok_or_else(|| {
        ChainError::InvalidData(format!(
            "Balance of {} overflows: free {} + reserved {}",
            address, info.data.free, info.data.reserved
        ))
    })
}
