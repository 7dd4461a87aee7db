//! Attach info request handling.
//!
//! Composes the memoized cluster response with a per-request fabric
//! interface pick. The remote fetch and the hardware scan only run when the
//! caches cannot answer, or on an explicit refresh. Disabling the response
//! cache does not disable the fabric table: rotation state has to survive
//! between requests. No cache lock is held while a collaborator is called.

use backoff::ExponentialBackoffBuilder;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AttachInfoResponse, NumaNode, RetryConfig};
use crate::domain::ports::{AttachInfoSource, FabricScanner};
use crate::services::attach_info_cache::ResponseCache;
use crate::services::fabric_cache::FabricDeviceSelector;

/// Request handler for client attach info queries.
pub struct AttachInfoService {
    system_name: String,
    source: Arc<dyn AttachInfoSource>,
    scanner: Arc<dyn FabricScanner>,
    attach_info_cache: Option<Arc<dyn ResponseCache>>,
    fabric_cache: Option<Arc<dyn FabricDeviceSelector>>,
    provider_override: Option<String>,
    retry: RetryConfig,
}

impl AttachInfoService {
    /// Create a service without caches. Every request fetches and scans.
    pub fn new(
        system_name: impl Into<String>,
        source: Arc<dyn AttachInfoSource>,
        scanner: Arc<dyn FabricScanner>,
    ) -> Self {
        Self {
            system_name: system_name.into(),
            source,
            scanner,
            attach_info_cache: None,
            fabric_cache: None,
            provider_override: None,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_attach_info_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.attach_info_cache = Some(cache);
        self
    }

    pub fn with_fabric_cache(mut self, cache: Arc<dyn FabricDeviceSelector>) -> Self {
        self.fabric_cache = Some(cache);
        self
    }

    /// Scan for this provider instead of the one the cluster reports.
    pub fn with_provider_override(mut self, provider: Option<String>) -> Self {
        self.provider_override = provider;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    /// Whether attach info responses are memoized between requests.
    pub fn caching_enabled(&self) -> bool {
        self.attach_info_cache.is_enabled()
    }

    /// Answer an attach info request from a client on `numa_node`.
    ///
    /// A fabric selection failure does not fail the request: the response is
    /// returned without an interface recommendation.
    pub async fn get_attach_info(&self, numa_node: NumaNode) -> DomainResult<AttachInfoResponse> {
        let resp = self.attach_info().await?;

        match self.select_interface(numa_node, &resp).await {
            Ok(composed) => Ok(composed),
            Err(err) => {
                warn!(
                    numa_node,
                    error = %err,
                    "no fabric interface selected, serving attach info without a recommendation"
                );
                Ok(resp.as_ref().clone())
            }
        }
    }

    /// Discard cached state: refetch attach info and rescan the fabric.
    pub async fn refresh(&self) -> DomainResult<()> {
        let resp = self.fetch_with_retry().await?;
        let provider = self.scan_provider(&resp).to_string();
        self.remember(resp).await;
        self.scan_fabric(&provider).await?;
        info!(system = %self.system_name, "attach info and fabric caches refreshed");
        Ok(())
    }

    async fn attach_info(&self) -> DomainResult<Arc<AttachInfoResponse>> {
        if let Some(cached) = self.attach_info_cache.get().await {
            debug!(system = %self.system_name, "serving cached attach info");
            return Ok(cached);
        }

        let resp = self.fetch_with_retry().await?;
        let resp = Arc::new(resp);
        self.remember(resp.as_ref().clone()).await;
        Ok(resp)
    }

    async fn remember(&self, resp: AttachInfoResponse) {
        if !self.attach_info_cache.is_enabled() {
            return;
        }

        if let Err(err) = self.attach_info_cache.store(resp).await {
            warn!(error = %err, "failed to cache attach info response");
        }
    }

    async fn select_interface(
        &self,
        numa_node: NumaNode,
        resp: &AttachInfoResponse,
    ) -> DomainResult<AttachInfoResponse> {
        if !FabricDeviceSelector::is_cached(&self.fabric_cache).await {
            self.scan_fabric(self.scan_provider(resp)).await?;
        }

        let fabric_if = self
            .fabric_cache
            .get_device(numa_node, resp.net_dev_class)
            .await?;

        debug!(
            numa_node,
            interface = %fabric_if.name,
            domain = %fabric_if.domain(),
            "selected fabric interface"
        );
        Ok(resp.with_interface(&fabric_if))
    }

    fn scan_provider<'a>(&'a self, resp: &'a AttachInfoResponse) -> &'a str {
        self.provider_override.as_deref().unwrap_or(&resp.provider)
    }

    async fn scan_fabric(&self, provider: &str) -> DomainResult<()> {
        let scan = self.scanner.scan(provider).await?;
        debug!(provider, entries = scan.len(), "fabric scan complete");
        self.fabric_cache.populate(scan).await
    }

    async fn fetch_with_retry(&self) -> DomainResult<AttachInfoResponse> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(self.retry.initial_backoff_ms))
            .with_max_interval(Duration::from_millis(self.retry.max_backoff_ms))
            .with_max_elapsed_time(Some(Duration::from_millis(self.retry.max_elapsed_ms)))
            .build();

        backoff::future::retry_notify(
            policy,
            || async {
                self.source
                    .fetch(&self.system_name)
                    .await
                    .map_err(|err| {
                        if err.is_transient() {
                            backoff::Error::transient(err)
                        } else {
                            backoff::Error::permanent(err)
                        }
                    })
            },
            |err: DomainError, wait: Duration| {
                warn!(
                    system = %self.system_name,
                    error = %err,
                    retry_in = ?wait,
                    "attach info fetch failed, retrying"
                );
            },
        )
        .await
    }
}
