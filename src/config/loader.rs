//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the provider API key.
pub const ENV_API_KEY: &str = "QUOTE_GATEWAY_API_KEY";
/// Fallback name commonly used for Alpha Vantage keys.
pub const ENV_ALPHAVANTAGE_API_KEY: &str = "ALPHAVANTAGE_API_KEY";
/// Environment variable holding the caller bearer token.
pub const ENV_BEARER_TOKEN: &str = "QUOTE_GATEWAY_BEARER_TOKEN";
/// Environment variable overriding the listener address.
pub const ENV_BIND_ADDRESS: &str = "QUOTE_GATEWAY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML document into a configuration. Missing fields take defaults.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Overlay environment values on top of `config`.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> GatewayConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(key) = non_empty(ENV_API_KEY).or_else(|| non_empty(ENV_ALPHAVANTAGE_API_KEY)) {
        config.provider.api_key = key;
    }
    if let Some(token) = non_empty(ENV_BEARER_TOKEN) {
        config.auth.bearer_token = token;
    }
    if let Some(addr) = non_empty(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }

    config
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
