//! Domain errors for the attach agent.

use thiserror::Error;

use crate::domain::models::{NetDevClass, NumaNode};

/// Domain-level errors raised by the caches, the request handler and the
/// collaborator ports.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} is absent")]
    CacheAbsent(&'static str),

    #[error("cache is not enabled")]
    CacheDisabled,

    #[error("empty attach info response")]
    EmptyInput,

    #[error("fabric data not cached")]
    NotCached,

    #[error("no fallback network device found")]
    NoFallbackDevice,

    #[error("no suitable fabric interface found on NUMA node {numa_node} for class {class}")]
    NoSuitableInterface { numa_node: NumaNode, class: NetDevClass },

    #[error("device for NUMA node {numa_node} index {index} did not exist ({len} devices)")]
    DeviceIndexOutOfRange {
        numa_node: NumaNode,
        index: usize,
        len: usize,
    },

    #[error("failed to resolve alias for device {device}: {reason}")]
    AliasResolution { device: String, reason: String },

    #[error("attach info fetch failed: {0}")]
    RemoteFetch(String),

    #[error("fabric scan failed: {0}")]
    FabricScan(String),

    #[error("invalid network device class: {0}")]
    InvalidNetDevClass(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Whether retrying the failed operation may succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::RemoteFetch(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DomainError {
    fn from(err: serde_yaml::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
