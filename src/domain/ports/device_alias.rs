//! Device alias port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Resolves the OS-level alias of a fabric device.
#[async_trait]
pub trait DeviceAliasResolver: Send + Sync {
    async fn resolve(&self, device: &str) -> DomainResult<String>;
}
