//! Single-slot memoization of the cluster attach info response.
//!
//! The slot is the only state besides the `enabled` flag fixed at
//! construction. "Initialized" is the slot holding a value, so a reader can
//! never see the cache initialized with a stale or missing response.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::AttachInfoResponse;

/// Memoized attach info, usable by many concurrent callers.
///
/// Implemented for `Option<T>` so that an absent cache reports itself as
/// disabled and uncached, and fails `store` with `DomainError::CacheAbsent`.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Whether the cache was constructed enabled.
    fn is_enabled(&self) -> bool;

    /// Whether the cache is enabled and holds a response.
    async fn is_cached(&self) -> bool;

    /// Replace the memoized response.
    async fn store(&self, resp: AttachInfoResponse) -> DomainResult<()>;

    /// The memoized response, if any.
    async fn get(&self) -> Option<Arc<AttachInfoResponse>>;
}

/// In-memory attach info cache.
#[derive(Debug)]
pub struct AttachInfoCache {
    enabled: bool,
    slot: RwLock<Option<Arc<AttachInfoResponse>>>,
}

impl AttachInfoCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            slot: RwLock::new(None),
        }
    }
}

#[async_trait]
impl ResponseCache for AttachInfoCache {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn is_cached(&self) -> bool {
        self.enabled && self.slot.read().await.is_some()
    }

    async fn store(&self, resp: AttachInfoResponse) -> DomainResult<()> {
        if !self.enabled {
            return Err(DomainError::CacheDisabled);
        }

        if resp.is_empty() {
            return Err(DomainError::EmptyInput);
        }

        let mut slot = self.slot.write().await;
        debug!(
            provider = %resp.provider,
            ranks = resp.rank_uris.len(),
            replaced = slot.is_some(),
            "cached attach info response"
        );
        *slot = Some(Arc::new(resp));
        Ok(())
    }

    async fn get(&self) -> Option<Arc<AttachInfoResponse>> {
        if !self.enabled {
            return None;
        }

        self.slot.read().await.clone()
    }
}

#[async_trait]
impl<T: ResponseCache + ?Sized> ResponseCache for Arc<T> {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    async fn is_cached(&self) -> bool {
        (**self).is_cached().await
    }

    async fn store(&self, resp: AttachInfoResponse) -> DomainResult<()> {
        (**self).store(resp).await
    }

    async fn get(&self) -> Option<Arc<AttachInfoResponse>> {
        (**self).get().await
    }
}

#[async_trait]
impl<T: ResponseCache> ResponseCache for Option<T> {
    fn is_enabled(&self) -> bool {
        self.as_ref().is_some_and(ResponseCache::is_enabled)
    }

    async fn is_cached(&self) -> bool {
        match self {
            Some(cache) => cache.is_cached().await,
            None => false,
        }
    }

    async fn store(&self, resp: AttachInfoResponse) -> DomainResult<()> {
        match self {
            Some(cache) => cache.store(resp).await,
            None => Err(DomainError::CacheAbsent("attach info cache")),
        }
    }

    async fn get(&self) -> Option<Arc<AttachInfoResponse>> {
        match self {
            Some(cache) => cache.get().await,
            None => None,
        }
    }
}
