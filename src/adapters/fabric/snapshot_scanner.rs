//! Fabric scan results read from a snapshot file.
//!
//! Each record may list the providers it supports; a record without
//! providers matches any provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::FabricScanEntry;
use crate::domain::ports::FabricScanner;

/// One device in a scan snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    #[serde(flatten)]
    pub entry: FabricScanEntry,

    #[serde(default)]
    pub providers: Vec<String>,
}

impl ScanRecord {
    fn supports(&self, provider: &str) -> bool {
        self.providers.is_empty() || self.providers.iter().any(|p| p == provider)
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotFabricScanner {
    path: PathBuf,
}

impl SnapshotFabricScanner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> DomainResult<Vec<ScanRecord>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| DomainError::FabricScan(format!("{}: {err}", self.path.display())))?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}

#[async_trait]
impl FabricScanner for SnapshotFabricScanner {
    async fn scan(&self, provider: &str) -> DomainResult<Vec<FabricScanEntry>> {
        let records = self.load().await?;
        let total = records.len();

        let entries: Vec<FabricScanEntry> = records
            .into_iter()
            .filter(|record| record.supports(provider))
            .map(|record| record.entry)
            .collect();

        debug!(
            provider,
            path = %self.path.display(),
            total,
            matched = entries.len(),
            "loaded fabric scan snapshot"
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::NetDevClass;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn snapshot() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
- device_name: ib0
  numa_node: 0
  net_dev_class: infiniband
  providers: ["ofi+verbs;ofi_rxm"]
- device_name: eth0
  numa_node: 1
  net_dev_class: ether
  providers: ["ofi+tcp;ofi_rxm"]
- device_name: lo
  numa_node: 0
  net_dev_class: loopback
"#
        )
        .unwrap();
        file
    }

    #[tokio::test]
    async fn test_scan_filters_by_provider() {
        let file = snapshot();
        let scanner = SnapshotFabricScanner::new(file.path());

        let entries = scanner.scan("ofi+verbs;ofi_rxm").await.unwrap();
        assert_eq!(
            entries,
            vec![
                FabricScanEntry::new("ib0", 0, NetDevClass::Infiniband),
                FabricScanEntry::new("lo", 0, NetDevClass::Loopback),
            ]
        );
    }

    #[tokio::test]
    async fn test_scan_preserves_order() {
        let file = snapshot();
        let scanner = SnapshotFabricScanner::new(file.path());

        let entries = scanner.scan("ofi+tcp;ofi_rxm").await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.device_name.as_str()).collect();
        assert_eq!(names, vec!["eth0", "lo"]);
    }

    #[tokio::test]
    async fn test_missing_snapshot() {
        let scanner = SnapshotFabricScanner::new("/nonexistent/fabric.yaml");
        let err = scanner.scan("ofi+tcp").await.unwrap_err();
        assert!(matches!(err, DomainError::FabricScan(_)));
    }
}
