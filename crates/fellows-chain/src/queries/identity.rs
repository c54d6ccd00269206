//! Identity queries from the People chain.

use crate::client::ChainConnection;
use crate::error::ChainError;
use crate::source::IdentitySource;
use crate::ss58::parse_address;
use async_trait::async_trait;
use fellows_core::{DISPLAY_NAME_MISSING, Identity};
use subxt::dynamic::{At, DecodedValueThunk, Value};
use subxt::ext::scale_value::ValueDef;
use subxt::utils::AccountId32;

/// People chain client for identity queries.
#[derive(Debug)]
pub struct PeopleChainClient {
    connection: ChainConnection,
}

impl PeopleChainClient {
    /// Wrap an open connection to a People chain.
    pub fn new(connection: ChainConnection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &ChainConnection {
        &self.connection
    }

    pub fn into_connection(self) -> ChainConnection {
        self.connection
    }

    async fn get_identity(&self, address: &str) -> Result<Option<Identity>, ChainError> {
        let account = parse_address(address)?;

        if let Some(identity) = self.get_direct_identity(&account).await? {
            return Ok(Some(identity));
        }

        // Might be a sub-account of a registered identity
        self.get_sub_identity(&account).await
    }

    /// Get direct identity (not sub-identity).
    async fn get_direct_identity(
        &self,
        account: &AccountId32,
    ) -> Result<Option<Identity>, ChainError> {
        let storage_query = subxt::dynamic::storage(
            "Identity",
            "IdentityOf",
            vec![Value::from_bytes(account.clone())],
        );

        let result: Option<DecodedValueThunk> = self
            .connection
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(None);
        };

        let display_name = registration_display_name(&value.to_value()?)?;

        Ok(Some(Identity {
            display_name,
            sub_identity: None,
        }))
    }

    /// Resolve `parent/sub` for a sub-account.
    async fn get_sub_identity(
        &self,
        account: &AccountId32,
    ) -> Result<Option<Identity>, ChainError> {
        let storage_query = subxt::dynamic::storage(
            "Identity",
            "SuperOf",
            vec![Value::from_bytes(account.clone())],
        );

        let result: Option<DecodedValueThunk> = self
            .connection
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(None);
        };

        let Some((parent_account, sub_name)) = decode_super_of(&value.to_value()?) else {
            return Ok(None);
        };

        // Only one level up
        let parent = self.get_direct_identity(&parent_account).await?;
        let parent_name = parent.and_then(|identity| identity.display_name);

        Ok(Some(Identity {
            display_name: compose_sub_identity(parent_name, sub_name.clone()),
            sub_identity: sub_name,
        }))
    }
}

#[async_trait]
impl IdentitySource for PeopleChainClient {
    async fn fetch_identity(&self, address: &str) -> Result<Option<Identity>, ChainError> {
        self.connection.run_query(self.get_identity(address)).await
    }
}

/// Best-effort display name for `address`.
///
/// Never fails: anything other than an identity with a populated display
/// field yields [`DISPLAY_NAME_MISSING`].
pub async fn get_display_name<S>(source: &S, address: &str) -> String
where
    S: IdentitySource + ?Sized,
{
    match source.fetch_identity(address).await {
        Ok(Some(identity)) => match identity.populated_display_name() {
            Some(name) => name.to_string(),
            None => {
                tracing::debug!("Identity for {} has no display name", address);
                DISPLAY_NAME_MISSING.to_string()
            }
        },
        Ok(None) => {
            tracing::debug!("No identity registered for {}", address);
            DISPLAY_NAME_MISSING.to_string()
        }
        Err(e) => {
            tracing::debug!("Failed to fetch identity for {}: {}", address, e);
            DISPLAY_NAME_MISSING.to_string()
        }
    }
}

/// Pick the `Registration` out of an `IdentityOf` value.
///
/// Older runtimes store `(Registration, Option<Username>)`, newer ones the
/// `Registration` alone.
fn select_registration(decoded: &Value<u32>) -> Result<&Value<u32>, ChainError> {
    // Registration = { judgements, deposit, info }
    if decoded.at("info").is_some() {
        return Ok(decoded);
    }

    decoded
        .at(0)
        .filter(|registration| registration.at("info").is_some())
        .ok_or_else(|| ChainError::InvalidData("Malformed identity registration".into()))
}

/// Display name of an `IdentityOf` value, if the field holds text.
fn registration_display_name(decoded: &Value<u32>) -> Result<Option<String>, ChainError> {
    let registration = select_registration(decoded)?;
    Ok(registration
        .at("info")
        .and_then(|info| info.at("display"))
        .and_then(extract_data_field))
}

/// Decode `SuperOf = (parent_account, sub_name)`.
fn decode_super_of(decoded: &Value<u32>) -> Option<(AccountId32, Option<String>)> {
    let parent = extract_account_bytes(decoded.at(0))?;
    let sub_name = decoded.at(1).and_then(extract_data_field);
    Some((AccountId32::from(parent), sub_name))
}

/// Name shown for a sub-account.
fn compose_sub_identity(parent: Option<String>, sub: Option<String>) -> Option<String> {
    match (parent, sub) {
        (Some(parent), Some(sub)) => Some(format!("{}/{}", parent, sub)),
        (Some(parent), None) => Some(parent),
        (None, Some(sub)) => Some(sub),
        (None, None) => None,
    }
}

/// Extract text from a `Data` field.
///
/// Only the `Raw0`..`Raw32` variants carry text. `None` and the hash
/// variants (BlakeTwo256, Sha256, Keccak256, ShaThree256) yield nothing.
fn extract_data_field(value: &Value<u32>) -> Option<String> {
    let ValueDef::Variant(variant) = &value.value else {
        return None;
    };
    if !variant.name.starts_with("Raw") {
        return None;
    }

    let bytes = extract_bytes(variant.values.at(0)?)?;
    let filtered: Vec<u8> = bytes.into_iter().filter(|&b| b != 0).collect();
    if filtered.is_empty() {
        return None;
    }

    Some(String::from_utf8_lossy(&filtered).to_string())
}

/// Collect a byte array, looking through newtype wrappers such as `AccountId32`.
fn extract_bytes(value: &Value<u32>) -> Option<Vec<u8>> {
    let ValueDef::Composite(composite) = &value.value else {
        return None;
    };

    let fields: Vec<&Value<u32>> = composite.values().collect();
    if let [inner] = fields.as_slice()
        && matches!(inner.value, ValueDef::Composite(_))
    {
        return extract_bytes(inner);
    }

    fields
        .into_iter()
        .map(|v| v.as_u128().and_then(|b| u8::try_from(b).ok()))
        .collect()
}

/// Extract account ID bytes from a Value.
fn extract_account_bytes(value: Option<&Value<u32>>) -> Option<[u8; 32]> {
    extract_bytes(value?)?.try_into().ok()
}
