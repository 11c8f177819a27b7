//! Configuration management for Agrochain

use crate::error::LedgerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Leading zero hex digits a valid proof hash must carry.
    #[serde(default = "default_difficulty")]
    pub difficulty: usize,
    /// Upper bound on the proof-of-work scan.
    #[serde(default = "default_max_pow_iterations")]
    pub max_pow_iterations: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            api_port: default_api_port(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            difficulty: default_difficulty(),
            max_pow_iterations: default_max_pow_iterations(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            network: NetworkConfig::default(),
            ledger: LedgerConfig::default(),
        }
    }
}

fn default_api_port() -> u16 {
    8080
}

fn default_difficulty() -> usize {
    crate::pow::DEFAULT_DIFFICULTY
}

fn default_max_pow_iterations() -> u64 {
    crate::pow::DEFAULT_MAX_ITERATIONS
}

/// Load configuration from the given TOML file, falling back to defaults
/// when the file is absent.
pub fn load_config(path: &Path) -> Result<Config, LedgerError> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        Config::default()
    } else {
        toml::from_str(&config_str)
            .map_err(|e| LedgerError::ConfigError(format!("{}: {}", path.display(), e)))?
    };

    validate(config)
}

/// Reject configurations that would wedge or no-op the proof-of-work scan.
fn validate(config: Config) -> Result<Config, LedgerError> {
    if config.ledger.difficulty == 0 {
        return Err(LedgerError::ConfigError(
            "ledger.difficulty must be at least 1".to_string(),
        ));
    }
    if config.ledger.max_pow_iterations == 0 {
        return Err(LedgerError::ConfigError(
            "ledger.max_pow_iterations must be at least 1".to_string(),
        ));
    }
    Ok(config)
}
