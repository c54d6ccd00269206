//! Report configuration.
//!
//! Defaults target the public Polkadot endpoints. A JSON file in the
//! platform config directory may override any field; it is only ever read.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::ChainRole;

pub const DEFAULT_RELAY_ENDPOINT: &str = "wss://rpc.polkadot.io";
pub const DEFAULT_PEOPLE_ENDPOINT: &str = "wss://polkadot-people-rpc.polkadot.io";
pub const DEFAULT_COLLECTIVES_ENDPOINT: &str = "wss://polkadot-collectives-rpc.polkadot.io";
pub const DEFAULT_TESTNET_ENDPOINT: &str = "wss://paseo.rpc.amforc.com";

/// Account reported on before the member table.
pub const DEFAULT_ADDRESS: &str = "15DCZocYEM2ThYCAj22QE4QENRvUNVrDtoLBVbCm5x4EQncr";

/// Members looked up concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Other configuration error.
    #[error("{0}")]
    Other(String),
}

/// RPC endpoint per chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub relay: String,
    pub people: String,
    pub collectives: String,
    pub testnet: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            relay: DEFAULT_RELAY_ENDPOINT.to_string(),
            people: DEFAULT_PEOPLE_ENDPOINT.to_string(),
            collectives: DEFAULT_COLLECTIVES_ENDPOINT.to_string(),
            testnet: DEFAULT_TESTNET_ENDPOINT.to_string(),
        }
    }
}

impl EndpointConfig {
    /// Endpoint URL for a chain.
    pub fn for_role(&self, role: ChainRole) -> &str {
        match role {
            ChainRole::Relay => &self.relay,
            ChainRole::People => &self.people,
            ChainRole::Collectives => &self.collectives,
            ChainRole::TestNet => &self.testnet,
        }
    }
}

/// Token used to render balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            symbol: "DOT".to_string(),
            decimals: 10,
        }
    }
}

fn default_testnet_token() -> TokenConfig {
    TokenConfig {
        symbol: "PAS".to_string(),
        decimals: 10,
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoints: EndpointConfig,
    /// Account reported on before the member table.
    #[serde(default = "default_address")]
    pub address: String,
    /// Per-query timeout in seconds. No timeout when unset.
    #[serde(default)]
    pub query_timeout_secs: Option<u64>,
    /// Members looked up concurrently per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default = "default_testnet_token")]
    pub testnet_token: TokenConfig,
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            address: default_address(),
            query_timeout_secs: None,
            batch_size: DEFAULT_BATCH_SIZE,
            token: TokenConfig::default(),
            testnet_token: default_testnet_token(),
        }
    }
}

impl AppConfig {
    /// Per-query timeout, if configured.
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_secs.map(Duration::from_secs)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Other("batch_size must be at least 1".to_string()));
        }
        if self.query_timeout_secs == Some(0) {
            return Err(ConfigError::Other(
                "query_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.address.trim().is_empty() {
            return Err(ConfigError::Other("address must not be empty".to_string()));
        }
        for role in ChainRole::all() {
            let endpoint = self.endpoints.for_role(*role);
            if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
                return Err(ConfigError::Other(format!(
                    "{} endpoint must be a ws:// or wss:// URL, got '{}'",
                    role, endpoint
                )));
            }
        }
        Ok(())
    }
}

// ==================== Path Utilities ====================

/// Get the config directory.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("io", "polkadot", "fellows")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))
}

/// Get the config file path.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    get_config_dir().map(|dir| dir.join("config.json"))
}

// ==================== Config I/O ====================

/// Load configuration from the default location, or defaults if absent.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path()?)
}

/// Load configuration from a file, or defaults if the file does not exist.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.endpoints.relay, "wss://rpc.polkadot.io");
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert_eq!(config.batch_size, 50);
        assert!(config.query_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_deserialize_missing_fields() {
        let json = r#"{"endpoints":{"people":"wss://people.example"},"query_timeout_secs":5}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.endpoints.people, "wss://people.example");
        assert_eq!(config.endpoints.relay, DEFAULT_RELAY_ENDPOINT);
        assert_eq!(config.query_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.token, TokenConfig::default());
        assert_eq!(config.testnet_token.symbol, "PAS");
    }

    #[test]
    fn test_app_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let config = AppConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_http_endpoint() {
        let mut config = AppConfig::default();
        config.endpoints.collectives = "https://collectives.example".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Collectives chain"));
    }

    #[test]
    fn test_endpoint_for_role() {
        let endpoints = EndpointConfig::default();
        assert_eq!(endpoints.for_role(ChainRole::TestNet), DEFAULT_TESTNET_ENDPOINT);
        assert_eq!(
            endpoints.for_role(ChainRole::Collectives),
            DEFAULT_COLLECTIVES_ENDPOINT
        );
    }

    #[test]
    fn test_load_config_missing_file() {
        let path = std::env::temp_dir().join("fellows-config-does-not-exist.json");
        let config = load_config_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("fellows-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"address":"5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY","batch_size":8}"#)
            .unwrap();
        let config = load_config_from(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.address, "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY");
        assert_eq!(config.batch_size, 8);
    }

    #[test]
    fn test_load_config_invalid_json() {
        let path = std::env::temp_dir().join(format!("fellows-bad-config-{}.json", std::process::id()));
        fs::write(&path, "{not json").unwrap();
        let result = load_config_from(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }
}
