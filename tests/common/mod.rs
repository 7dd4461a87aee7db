//! Common test utilities for integration tests
//!
//! In-memory collaborators with call counters, plus fixture builders shared
//! across the integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use attach_agent::domain::models::RankUri;
use attach_agent::domain::ports::{AttachInfoSource, FabricScanner};
use attach_agent::{AttachInfoResponse, DomainError, DomainResult, FabricScanEntry, NetDevClass};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Attach info response for a two-rank system on `provider`.
pub fn attach_info(provider: &str, class: NetDevClass) -> AttachInfoResponse {
    AttachInfoResponse {
        rank_uris: vec![
            RankUri {
                rank: 0,
                uri: format!("{provider}://10.0.0.1:31416"),
            },
            RankUri {
                rank: 1,
                uri: format!("{provider}://10.0.0.2:31416"),
            },
        ],
        ms_ranks: vec![0],
        provider: provider.to_string(),
        crt_timeout: 30,
        net_dev_class: class,
        ..Default::default()
    }
}

/// Source answering with a fixed response after a scripted list of failures.
pub struct ScriptedSource {
    response: Mutex<AttachInfoResponse>,
    failures: Mutex<VecDeque<DomainError>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(response: AttachInfoResponse) -> Self {
        Self {
            response: Mutex::new(response),
            failures: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_first(self, failures: Vec<DomainError>) -> Self {
        *self.failures.lock().unwrap() = failures.into();
        self
    }

    pub fn set_response(&self, response: AttachInfoResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttachInfoSource for ScriptedSource {
    async fn fetch(&self, _system: &str) -> DomainResult<AttachInfoResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(self.response.lock().unwrap().clone())
    }
}

/// Scanner returning fixed entries and recording the providers asked for.
pub struct RecordingScanner {
    entries: Vec<FabricScanEntry>,
    providers: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingScanner {
    pub fn new(entries: Vec<FabricScanEntry>) -> Self {
        Self {
            entries,
            providers: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.providers.lock().unwrap().len()
    }

    pub fn providers(&self) -> Vec<String> {
        self.providers.lock().unwrap().clone()
    }
}

#[async_trait]
impl FabricScanner for RecordingScanner {
    async fn scan(&self, provider: &str) -> DomainResult<Vec<FabricScanEntry>> {
        self.providers.lock().unwrap().push(provider.to_string());
        if self.fail {
            return Err(DomainError::FabricScan("probe failed".to_string()));
        }
        Ok(self.entries.clone())
    }
}

/// Two InfiniBand devices on NUMA 0, one on NUMA 1, and an Ethernet device
/// on NUMA 1.
pub fn two_node_scan() -> Vec<FabricScanEntry> {
    vec![
        FabricScanEntry::new("lo", 0, NetDevClass::Loopback),
        FabricScanEntry::new("ib0", 0, NetDevClass::Infiniband),
        FabricScanEntry::new("ib1", 0, NetDevClass::Infiniband),
        FabricScanEntry::new("ib2", 1, NetDevClass::Infiniband),
        FabricScanEntry::new("eth0", 1, NetDevClass::Ether),
    ]
}
