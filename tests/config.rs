//! Integration tests for loading configuration files

use decent_sdk::config::{load_config_from, Config};
use decent_sdk::error::SdkError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let config = load_config_from(temp_dir.path().join("decent.toml"))?;
    assert_eq!(config, Config::default());
    Ok(())
}

#[test]
fn test_file_overrides() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("decent.toml");
    fs::write(
        &path,
        r#"
[network]
chain_id = "0000000000000000000000000000000000000000000000000000000000000001"
address_prefix = "TST"

[transaction]
expiration_secs = 90

[logging]
level = "debug"
"#,
    )?;

    let config = load_config_from(&path)?;
    assert_eq!(config.network.address_prefix, "TST");
    assert_eq!(config.network.base_asset_id, "1.3.0");
    assert_eq!(config.transaction.expiration_secs, 90);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.chain_id_bytes()?[31], 1);
    Ok(())
}

#[test]
fn test_invalid_file_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("decent.toml");
    fs::write(&path, "[network]\naddress_prefix = \"\"\n")?;

    assert!(matches!(
        load_config_from(&path),
        Err(SdkError::ConfigError(_))
    ));
    Ok(())
}
