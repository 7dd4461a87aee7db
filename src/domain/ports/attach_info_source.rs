//! Remote attach info port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::AttachInfoResponse;

/// Fetches attach info for a system from the cluster management service.
///
/// Failures that may clear up on retry should be reported as
/// `DomainError::RemoteFetch`.
#[async_trait]
pub trait AttachInfoSource: Send + Sync {
    async fn fetch(&self, system: &str) -> DomainResult<AttachInfoResponse>;
}
