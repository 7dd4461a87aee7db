//! Attach info read from a snapshot file.
//!
//! The file holds one response in YAML (or JSON). It is re-read on every
//! fetch so that a refresh picks up an updated snapshot.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::AttachInfoResponse;
use crate::domain::ports::AttachInfoSource;

#[derive(Debug, Clone)]
pub struct SnapshotAttachInfoSource {
    path: PathBuf,
}

impl SnapshotAttachInfoSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AttachInfoSource for SnapshotAttachInfoSource {
    async fn fetch(&self, system: &str) -> DomainResult<AttachInfoResponse> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|err| {
            DomainError::RemoteFetch(format!("{}: {err}", self.path.display()))
        })?;
        let resp: AttachInfoResponse = serde_yaml::from_str(&raw)?;

        debug!(
            system,
            path = %self.path.display(),
            ranks = resp.rank_uris.len(),
            "loaded attach info snapshot"
        );
        Ok(resp)
    }
}
