//! Configuration management for CortexChain

use crate::error::ChainError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "CORTEX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NodeConfig {
    #[serde(default = "default_node_name")]
    pub name: String,
    #[serde(default = "default_network_id")]
    pub network_id: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: default_node_name(),
            network_id: default_network_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
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

fn default_node_name() -> String {
    "cortex-node".to_string()
}

fn default_network_id() -> String {
    "devnet".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Path consulted by [`load_config`]: `$CORTEX_CONFIG`, else `config.toml`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Loads the configuration, falling back to defaults when the file is absent.
pub fn load_config() -> Result<Config, ChainError> {
    let path = config_path();
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<Config, ChainError> {
    let config_str = fs::read_to_string(path)?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ChainError> {
    let mut config: Config = toml::from_str(config_str)?;
    config.logging.level = config.logging.level.to_lowercase();

    // Validate critical values
    if config.node.name.trim().is_empty() {
        return Err(ChainError::ConfigError("node.name must not be empty".to_string()));
    }
    if config.node.network_id.trim().is_empty() {
        return Err(ChainError::ConfigError(
            "node.network_id must not be empty".to_string(),
        ));
    }
    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        return Err(ChainError::ConfigError(format!(
            "logging.level must be one of {:?}, got '{}'",
            LOG_LEVELS, config.logging.level
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.node.network_id, "devnet");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = parse_config("[node]\nname = \"alpha\"\n\n[logging]\nlevel = \"DEBUG\"\n").unwrap();
        assert_eq!(config.node.name, "alpha");
        assert_eq!(config.node.network_id, "devnet");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_rejects_unknown_level() {
        let err = parse_config("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_rejects_blank_network_id() {
        assert!(parse_config("[node]\nnetwork_id = \"  \"\n").is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = parse_config("[node\nname = 1").unwrap_err();
        assert!(matches!(err, ChainError::ConfigError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[node]\nnetwork_id = \"testnet\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.node.network_id, "testnet");
    }
}
