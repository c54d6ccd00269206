//! SS58 address encoding utilities.

use crate::error::ChainError;
use std::str::FromStr;
use subxt::utils::AccountId32;

const SS58_PREFIX: &[u8] = b"SS58PRE";

/// Encode an AccountId32 with a specific SS58 prefix.
pub fn encode_ss58(account: &AccountId32, prefix: u16) -> String {
    let account_bytes: &[u8; 32] = account.as_ref();

    let mut payload = Vec::with_capacity(36);

    if prefix < 64 {
        payload.push(prefix as u8);
    } else if prefix < 16384 {
        // Two-byte encoding for larger prefixes
        let first = ((prefix & 0x00FC) >> 2) as u8 | 0x40;
        let second = ((prefix >> 8) as u8) | ((prefix & 0x03) << 6) as u8;
        payload.push(first);
        payload.push(second);
    } else {
        // Unsupported prefix, fall back to generic
        payload.push(42);
    }

    payload.extend_from_slice(account_bytes);

    // Checksum is the first two bytes of blake2b-512 over "SS58PRE" ++ payload
    let mut checksum_input = Vec::with_capacity(SS58_PREFIX.len() + payload.len());
    checksum_input.extend_from_slice(SS58_PREFIX);
    checksum_input.extend_from_slice(&payload);

    let hash = sp_crypto_hashing::blake2_512(&checksum_input);
    payload.push(hash[0]);
    payload.push(hash[1]);

    bs58::encode(payload).into_string()
}

/// Parse an SS58 address of any prefix.
pub fn parse_address(address: &str) -> Result<AccountId32, ChainError> {
    AccountId32::from_str(address.trim())
        .map_err(|_| ChainError::InvalidAddress(address.to_string()))
}

/// Read the account id from the tail of a storage key.
///
/// Maps keyed by `Blake2_128Concat` or `Twox64Concat` end with the raw
/// 32-byte account, so the hasher prefix can be ignored.
pub fn account_from_key(key_bytes: &[u8]) -> Option<AccountId32> {
    if key_bytes.len() < 32 {
        return None;
    }
    let account_bytes: [u8; 32] = key_bytes[key_bytes.len() - 32..].try_into().ok()?;
    Some(AccountId32::from(account_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ss58_polkadot() {
        let addr = "15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5";
        let account = AccountId32::from_str(addr).unwrap();
        assert_eq!(encode_ss58(&account, 0), addr);
    }

    #[test]
    fn test_encode_ss58_from_generic() {
        // Alice, generic substrate prefix
        let account = parse_address("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY").unwrap();
        assert_eq!(
            encode_ss58(&account, 2),
            "HNZata7iMYWmk5RvZRTiAsSDhV8366zq2YGb3tLH5Upf74F"
        );
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!(matches!(
            parse_address("not-an-address"),
            Err(ChainError::InvalidAddress(_))
        ));
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_account_from_key() {
        let account = parse_address("15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5").unwrap();

        // 32 bytes of pallet/storage prefix, 8 bytes of twox64 hash, then the account
        let mut key = vec![0xAB; 40];
        key.extend_from_slice(&account.0);

        assert_eq!(account_from_key(&key), Some(account));
        assert_eq!(account_from_key(&[0u8; 16]), None);
    }
}
