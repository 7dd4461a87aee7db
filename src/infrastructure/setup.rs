//! Wiring of the request handler from configuration
//!
//! Builds the caches and the file-backed collaborators named by the config,
//! and hands them to an `AttachInfoService`.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::adapters::attach_info::SnapshotAttachInfoSource;
use crate::adapters::fabric::{SnapshotFabricScanner, StaticAliasResolver};
use crate::domain::models::Config;
use crate::domain::ports::{DeviceAliasResolver, NullAliasResolver};
use crate::services::{AttachInfoCache, AttachInfoService, LocalFabricCache};

/// Caches and service built from one configuration.
pub struct AgentComponents {
    pub attach_info_cache: Arc<AttachInfoCache>,
    pub fabric_cache: Arc<LocalFabricCache>,
    pub service: AttachInfoService,
}

/// Build a fabric cache resolving aliases from the configured table.
pub fn build_fabric_cache(config: &Config) -> LocalFabricCache {
    let alias_resolver: Arc<dyn DeviceAliasResolver> = if config.fabric.aliases.is_empty() {
        Arc::new(NullAliasResolver::new())
    } else {
        Arc::new(StaticAliasResolver::new(config.fabric.aliases.clone()))
    };

    LocalFabricCache::new(alias_resolver)
}

/// Build the agent's caches and request handler.
pub fn build_components(config: &Config) -> Result<AgentComponents> {
    let attach_info_path = config
        .attach_info
        .file
        .as_ref()
        .context("attach_info.file must be set to locate attach info")?;
    let scan_path = config
        .fabric
        .scan_file
        .as_ref()
        .context("fabric.scan_file must be set to locate fabric scan results")?;

    let attach_info_cache = Arc::new(AttachInfoCache::new(config.cache.enabled));
    let fabric_cache = Arc::new(build_fabric_cache(config));

    let service = AttachInfoService::new(
        config.system_name.clone(),
        Arc::new(SnapshotAttachInfoSource::new(attach_info_path)),
        Arc::new(SnapshotFabricScanner::new(scan_path)),
    )
    .with_attach_info_cache(attach_info_cache.clone())
    .with_fabric_cache(fabric_cache.clone())
    .with_provider_override(config.fabric.provider_override.clone())
    .with_retry(config.retry.clone());

    info!(
        system = %config.system_name,
        caching = config.cache.enabled,
        attach_info = %attach_info_path.display(),
        fabric_scan = %scan_path.display(),
        "attach agent components initialized"
    );

    Ok(AgentComponents {
        attach_info_cache,
        fabric_cache,
        service,
    })
}
