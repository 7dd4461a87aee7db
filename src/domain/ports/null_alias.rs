//! Null alias resolver implementation.
//!
//! Used when no alias source is configured. Every lookup fails, which the
//! fabric cache treats as "no alias".

use async_trait::async_trait;

use super::device_alias::DeviceAliasResolver;
use crate::domain::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, Default)]
pub struct NullAliasResolver;

impl NullAliasResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeviceAliasResolver for NullAliasResolver {
    async fn resolve(&self, device: &str) -> DomainResult<String> {
        Err(DomainError::AliasResolution {
            device: device.to_string(),
            reason: "no alias source configured".to_string(),
        })
    }
}
