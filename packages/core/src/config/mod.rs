//! Configuration management for docker-host
//!
//! Handles loading, saving, and validating the JSONC configuration file.
//! A missing file yields the defaults; unknown keys are rejected.

pub mod paths;
pub mod schema;

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use jsonc_parser::parse_to_serde_value;

pub use paths::{get_config_dir, get_config_path, get_hosts_path};
pub use schema::Config;

/// Load configuration from the config file
///
/// If the config file doesn't exist, creates a new one with default values.
/// Supports JSONC (JSON with comments).
pub fn load_config() -> Result<Config> {
    let config_path =
        get_config_path().ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default at: {}",
            config_path.display()
        );
        let config = Config::default();
        save_config_to(&config, &config_path)?;
        return Ok(config);
    }

    load_config_from(&config_path)
}

/// Load configuration from a specific file
///
/// Returns the default configuration when the file does not exist.
pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        tracing::debug!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
        return Ok(Config::default());
    }

    let mut file = File::open(config_path)
        .with_context(|| format!("Failed to open config file: {}", config_path.display()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let parsed_value = parse_to_serde_value(&contents, &Default::default())
        .map_err(|e| anyhow::anyhow!("Invalid JSONC in config file: {}", e))?
        .ok_or_else(|| anyhow::anyhow!("Config file is empty"))?;

    // deny_unknown_fields rejects unknown keys here
    let config: Config = serde_json::from_value(parsed_value).with_context(|| {
        format!(
            "Invalid configuration in {}. Check for unknown fields or invalid values.",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Save configuration to the config file
pub fn save_config(config: &Config) -> Result<()> {
    let config_path =
        get_config_path().ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;
    save_config_to(config, &config_path)
}

/// Save configuration to a specific file
///
/// Creates the parent directory if needed and backs up an existing file
/// to config.json.bak before overwriting.
pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
            tracing::info!("Created config directory: {}", parent.display());
        }
    }

    if config_path.exists() {
        let backup_path = config_path.with_extension("json.bak");
        fs::copy(config_path, &backup_path)
            .with_context(|| format!("Failed to create backup at: {}", backup_path.display()))?;
        tracing::debug!("Created config backup: {}", backup_path.display());
    }

    let json = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

    let mut file = File::create(config_path)
        .with_context(|| format!("Failed to create config file: {}", config_path.display()))?;

    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    tracing::debug!("Saved config to: {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_jsonc_with_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                // managed hosts
                "version": 1,
                "machine_binary": "/usr/local/bin/docker-machine",
                "daemon_timeout_secs": 15
            }"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.machine_binary, "/usr/local/bin/docker-machine");
        assert_eq!(config.daemon_timeout_secs, 15);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"version": 1, "bind": "0.0.0.0"}"#).unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_save_creates_directory_and_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docker-host").join("config.json");

        save_config_to(&Config::default(), &path).unwrap();
        assert!(path.exists());

        let mut config = Config::default();
        config.daemon_timeout_secs = 60;
        save_config_to(&config, &path).unwrap();

        assert!(path.with_extension("json.bak").exists());
        assert_eq!(load_config_from(&path).unwrap(), config);
    }
}
