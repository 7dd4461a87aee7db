use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Main configuration structure for the attach agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Name of the cluster system this agent serves
    #[serde(default = "default_system_name")]
    pub system_name: String,

    /// Response and fabric cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Fabric scan configuration
    #[serde(default)]
    pub fabric: FabricConfig,

    /// Attach info source configuration
    #[serde(default)]
    pub attach_info: AttachInfoConfig,

    /// Retry policy for attach info fetches
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_system_name() -> String {
    "daos_server".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_name: default_system_name(),
            cache: CacheConfig::default(),
            fabric: FabricConfig::default(),
            attach_info: AttachInfoConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Memoize attach info and fabric scans between requests
    #[serde(default = "default_true")]
    pub enabled: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

/// Fabric scan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FabricConfig {
    /// Snapshot file holding fabric scan entries
    #[serde(default)]
    pub scan_file: Option<PathBuf>,

    /// Provider to scan for instead of the one the cluster reports
    #[serde(default)]
    pub provider_override: Option<String>,

    /// Static device name to alias table
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

/// Attach info source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AttachInfoConfig {
    /// Snapshot file holding an attach info response
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Give up after this many milliseconds of retrying
    #[serde(default = "default_max_elapsed_ms")]
    pub max_elapsed_ms: u64,
}

const fn default_initial_backoff_ms() -> u64 {
    250
}

const fn default_max_backoff_ms() -> u64 {
    5_000
}

const fn default_max_elapsed_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            max_elapsed_ms: default_max_elapsed_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolled log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
