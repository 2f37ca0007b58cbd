//! Configuration management for KingCoin scenarios

use crate::error::{CoinError, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_issuer_name")]
    pub issuer_name: String,
    #[serde(default = "default_holder_names")]
    pub holder_names: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            currency: default_currency(),
            issuer_name: default_issuer_name(),
            holder_names: default_holder_names(),
        }
    }
}

fn default_currency() -> String {
    "KC".to_string()
}

fn default_issuer_name() -> String {
    "Mint".to_string()
}

fn default_holder_names() -> Vec<String> {
    vec!["Alice".to_string(), "Bob".to_string()]
}

/// Loads `kingcoin.toml` from the working directory, falling back to
/// defaults when the file is absent.
pub fn load_config() -> Result<Config> {
    let config_str = fs::read_to_string("kingcoin.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        Config::default()
    } else {
        toml::from_str(&config_str)
            .map_err(|e| CoinError::ConfigError(format!("Invalid kingcoin.toml: {}", e)))?
    };
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.currency.is_empty() {
            return Err(CoinError::ConfigError("currency must be set".to_string()));
        }
        if self.issuer_name.is_empty() {
            return Err(CoinError::ConfigError(
                "issuer_name must be set".to_string(),
            ));
        }
        if self.holder_names.is_empty() {
            return Err(CoinError::ConfigError(
                "at least one holder is required".to_string(),
            ));
        }

        // Party names are unique within a run
        let mut names: Vec<&str> = self.holder_names.iter().map(String::as_str).collect();
        names.push(&self.issuer_name);
        names.sort_unstable();
        if names.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(CoinError::ConfigError(
                "party names must be unique".to_string(),
            ));
        }
        Ok(())
    }
}
