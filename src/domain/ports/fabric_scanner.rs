//! Hardware fabric scan port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::FabricScanEntry;

/// Enumerates the fabric interfaces usable with a provider.
///
/// The returned sequence is treated as complete, and its NUMA node and class
/// values are trusted as given.
#[async_trait]
pub trait FabricScanner: Send + Sync {
    async fn scan(&self, provider: &str) -> DomainResult<Vec<FabricScanEntry>>;
}
