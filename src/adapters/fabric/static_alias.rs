//! Device aliases taken from a fixed table, typically from configuration.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::DeviceAliasResolver;

#[derive(Debug, Clone, Default)]
pub struct StaticAliasResolver {
    aliases: HashMap<String, String>,
}

impl StaticAliasResolver {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self { aliases }
    }
}

#[async_trait]
impl DeviceAliasResolver for StaticAliasResolver {
    async fn resolve(&self, device: &str) -> DomainResult<String> {
        self.aliases
            .get(device)
            .cloned()
            .ok_or_else(|| DomainError::AliasResolution {
                device: device.to_string(),
                reason: "no alias configured".to_string(),
            })
    }
}
