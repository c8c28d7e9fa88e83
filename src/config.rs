//! Configuration management for the DECENT SDK

use crate::asset::{is_object_id, BASE_ASSET_ID, BASE_ASSET_PRECISION};
use crate::crypto::DEFAULT_ADDRESS_PREFIX;
use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File read by [`load_config`] from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "decent.toml";

/// Chain id of the DECENT main network.
pub const MAINNET_CHAIN_ID: &str =
    "17401602b201b3c45a3ad98afc6fb458f91f519bd30d1058adf6f2bed66376bc";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub transaction: TransactionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    #[serde(default = "default_address_prefix")]
    pub address_prefix: String,
    #[serde(default = "default_base_asset_id")]
    pub base_asset_id: String,
    #[serde(default = "default_base_asset_precision")]
    pub base_asset_precision: u8,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            address_prefix: default_address_prefix(),
            base_asset_id: default_base_asset_id(),
            base_asset_precision: default_base_asset_precision(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionConfig {
    /// Seconds after the head block time at which a transaction expires.
    #[serde(default = "default_expiration_secs")]
    pub expiration_secs: u32,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            expiration_secs: default_expiration_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_chain_id() -> String {
    MAINNET_CHAIN_ID.to_string()
}

fn default_address_prefix() -> String {
    DEFAULT_ADDRESS_PREFIX.to_string()
}

fn default_base_asset_id() -> String {
    BASE_ASSET_ID.to_string()
}

fn default_base_asset_precision() -> u8 {
    BASE_ASSET_PRECISION
}

fn default_expiration_secs() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Parses a TOML document and validates it.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let chain_id = &self.network.chain_id;
        if chain_id.len() != 64 || !chain_id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SdkError::ConfigError(
                "network.chain_id must be 64 hex characters".to_string(),
            ));
        }

        let prefix = &self.network.address_prefix;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SdkError::ConfigError(format!(
                "network.address_prefix must be non-empty alphanumeric, got {:?}",
                prefix
            )));
        }

        if !is_object_id(&self.network.base_asset_id) {
            return Err(SdkError::ConfigError(format!(
                "network.base_asset_id must be an object id, got {:?}",
                self.network.base_asset_id
            )));
        }

        if self.network.base_asset_precision > 18 {
            return Err(SdkError::ConfigError(format!(
                "network.base_asset_precision too large: {}",
                self.network.base_asset_precision
            )));
        }

        if self.transaction.expiration_secs == 0 {
            return Err(SdkError::ConfigError(
                "transaction.expiration_secs must be greater than zero".to_string(),
            ));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(SdkError::ConfigError(format!(
                "logging.level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.logging.level
            )));
        }

        Ok(())
    }

    /// Chain id as the 32 bytes prepended to every signed message.
    pub fn chain_id_bytes(&self) -> Result<[u8; 32]> {
        let bytes = hex::decode(&self.network.chain_id)
            .map_err(|e| SdkError::ConfigError(format!("Invalid chain_id: {}", e)))?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| SdkError::ConfigError("chain_id must be 32 bytes".to_string()))
    }
}

/// Loads `decent.toml` from the working directory.
pub fn load_config() -> Result<Config> {
    load_config_from(DEFAULT_CONFIG_FILE)
}

/// Loads configuration from `path`. A missing file yields the defaults.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path)?;
    Config::from_toml(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.network.address_prefix, "DCT");
        assert_eq!(config.network.base_asset_id, "1.3.0");
        assert_eq!(config.transaction.expiration_secs, 30);
        assert_eq!(config.chain_id_bytes().unwrap()[0], 0x17);
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml("[transaction]\nexpiration_secs = 120\n").unwrap();
        assert_eq!(config.transaction.expiration_secs, 120);
        assert_eq!(config.network, NetworkConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_toml("[network]\nchain_id = \"abc\"\n"),
            Err(SdkError::ConfigError(_))
        ));
        assert!(Config::from_toml("[transaction]\nexpiration_secs = 0\n").is_err());
        assert!(Config::from_toml("[logging]\nlevel = \"loud\"\n").is_err());
        assert!(Config::from_toml("[network]\nbase_asset_id = \"CASH\"\n").is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            Config::from_toml("[network"),
            Err(SdkError::ConfigError(_))
        ));
    }
}
