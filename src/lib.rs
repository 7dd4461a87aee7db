//! Attach Agent - node-local attach info caching
//!
//! Client processes on a compute node ask the agent which fabric interface to
//! use and how to reach the cluster's management service. The agent memoizes
//! the cluster's attach info response and the local fabric scan, answering
//! each request from memory with a NUMA-aware, round-robin interface pick.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): value types, errors and collaborator ports
//! - **Service Layer** (`services`): the response cache, the fabric device
//!   selector and the request handler composing them
//! - **Adapters** (`adapters`): file-backed collaborator implementations
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging and
//!   wiring
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use attach_agent::services::{FabricDeviceSelector, LocalFabricCache};
//! use attach_agent::domain::ports::NullAliasResolver;
//!
//! let cache = LocalFabricCache::new(Arc::new(NullAliasResolver::new()));
//! cache.populate(scan).await?;
//! let fabric_if = cache.get_device(numa_node, NetDevClass::Infiniband).await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AttachInfoResponse, Config, FabricInterface, FabricScanEntry, NetDevClass, NumaNode,
};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    AttachInfoCache, AttachInfoService, FabricDeviceSelector, LocalFabricCache, ResponseCache,
};
