use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Default project config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "attach-agent.yaml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "ATTACH_AGENT_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("System name cannot be empty")]
    EmptySystemName,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid initial_backoff_ms: {0}. Must be at least 1")]
    InvalidInitialBackoff(u64),

    #[error("Invalid backoff: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})")]
    InvalidBackoff(u64, u64),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. attach-agent.yaml in the working directory (optional)
    /// 3. Environment variables (ATTACH_AGENT_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::load_with(Yaml::file(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from a specific file, still honoring environment
    /// overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        Self::load_with(Yaml::file(path))
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    fn load_with(file: figment::providers::Data<Yaml>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.system_name.trim().is_empty() {
            return Err(ConfigError::EmptySystemName);
        }

        // Validate logging config
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        // Validate retry config
        if config.retry.initial_backoff_ms == 0 {
            return Err(ConfigError::InvalidInitialBackoff(
                config.retry.initial_backoff_ms,
            ));
        }

        if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        // Validate fabric config
        for (device, alias) in &config.fabric.aliases {
            if device.is_empty() || alias.is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "fabric alias entries must be non-empty (got '{device}' -> '{alias}')"
                )));
            }
        }

        if let Some(provider) = &config.fabric.provider_override {
            if provider.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "fabric provider_override cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
