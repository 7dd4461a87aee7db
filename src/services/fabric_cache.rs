//! NUMA-aware fabric interface selection.
//!
//! A scan is indexed by NUMA node. Requests for a node are served round-robin
//! from that node's interfaces; requests from a node without interfaces fall
//! back to another node, rotating the fallback across nodes.
//!
//! The default NUMA node is mutable shared state: every cross-NUMA fallback
//! moves it to the node that answered, so repeated fallbacks spread load over
//! all nodes that have interfaces. Selection therefore always takes the lock
//! exclusively.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    FabricInterface, FabricScanEntry, NetDevClass, NumaNode, DEFAULT_NETWORK_DEVICE,
    LOOPBACK_DEVICE,
};
use crate::domain::ports::DeviceAliasResolver;

/// Selects one scanned fabric interface per client request.
///
/// Implemented for `Option<T>`: an absent selector is never cached and fails
/// every other call with `DomainError::CacheAbsent`.
#[async_trait]
pub trait FabricDeviceSelector: Send + Sync {
    /// Whether a scan has been populated.
    async fn is_cached(&self) -> bool;

    /// Replace all cached state with the results of a scan.
    async fn populate(&self, scan: Vec<FabricScanEntry>) -> DomainResult<()>;

    /// Pick an interface of `class` for a client on `numa_node`.
    async fn get_device(
        &self,
        numa_node: NumaNode,
        class: NetDevClass,
    ) -> DomainResult<Arc<FabricInterface>>;

    /// Copy of the current NUMA table and default node.
    async fn snapshot(&self) -> DomainResult<FabricSnapshot>;
}

/// Read-only view of a populated fabric cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FabricSnapshot {
    pub default_numa_node: NumaNode,
    pub interfaces: BTreeMap<NumaNode, Vec<FabricInterface>>,
}

#[derive(Debug, Default)]
struct State {
    initialized: bool,
    /// Interfaces per NUMA node, in scan order.
    numa_fabric: HashMap<NumaNode, Vec<Arc<FabricInterface>>>,
    /// Next index to hand out per NUMA node.
    cursors: HashMap<NumaNode, usize>,
    default_numa_node: NumaNode,
}

impl State {
    fn device_count(&self, numa_node: NumaNode) -> usize {
        self.numa_fabric.get(&numa_node).map_or(0, Vec::len)
    }

    /// Round-robin step: index of the device to use on `numa_node`, or `None`
    /// if the node has no devices.
    fn load_balance(&mut self, numa_node: NumaNode) -> Option<usize> {
        let num_devs = self.device_count(numa_node);
        if num_devs == 0 {
            return None;
        }

        let cursor = self.cursors.entry(numa_node).or_insert(0);
        let index = *cursor;
        *cursor = (index + 1) % num_devs;
        Some(index)
    }

    /// Cross-NUMA fallback: starting after the default node, take the next
    /// node with devices in ascending node order (wrapping around), draw from
    /// it and make it the new default.
    fn select_remote(&mut self) -> Option<(NumaNode, usize)> {
        let mut nodes: Vec<NumaNode> = self.numa_fabric.keys().copied().collect();
        if nodes.is_empty() {
            return None;
        }
        nodes.sort_unstable();

        let start = nodes
            .iter()
            .position(|&node| node > self.default_numa_node)
            .unwrap_or(0);

        for offset in 0..nodes.len() {
            let node = nodes[(start + offset) % nodes.len()];
            if let Some(index) = self.load_balance(node) {
                self.default_numa_node = node;
                return Some((node, index));
            }
        }

        None
    }

    fn next_device(&mut self, numa_node: NumaNode) -> DomainResult<Arc<FabricInterface>> {
        let (node, index) = match self.load_balance(numa_node) {
            Some(index) => (numa_node, index),
            None => {
                let (selected, index) = self.select_remote().ok_or(DomainError::NoFallbackDevice)?;
                info!(
                    client_numa_node = numa_node,
                    selected_numa_node = selected,
                    "no network devices bound to client NUMA node, using fallback NUMA node"
                );
                (selected, index)
            }
        };

        let devices = self.numa_fabric.get(&node).map_or(&[][..], Vec::as_slice);
        devices
            .get(index)
            .cloned()
            .ok_or(DomainError::DeviceIndexOutOfRange {
                numa_node: node,
                index,
                len: devices.len(),
            })
    }

    /// Draws allowed when every draw goes through fallback: enough for each
    /// node with devices to be visited once per device of the largest node.
    fn fallback_draw_limit(&self) -> usize {
        let populated = self.numa_fabric.values().filter(|devs| !devs.is_empty()).count();
        let widest = self.numa_fabric.values().map(Vec::len).max().unwrap_or(0);
        populated * widest
    }

    fn get_device(
        &mut self,
        numa_node: NumaNode,
        class: NetDevClass,
    ) -> DomainResult<Arc<FabricInterface>> {
        if !self.initialized {
            return Err(DomainError::NotCached);
        }

        let local = self.device_count(numa_node);
        let max_draws = if local > 0 {
            local
        } else {
            self.fallback_draw_limit().max(1)
        };

        for _ in 0..max_draws {
            let fabric_if = self.next_device(numa_node)?;

            if fabric_if.net_dev_class != class {
                debug!(
                    device = %fabric_if.name,
                    device_class = %fabric_if.net_dev_class,
                    requested_class = %class,
                    "excluding device, network device class does not match"
                );
                continue;
            }

            return Ok(fabric_if);
        }

        Err(DomainError::NoSuitableInterface { numa_node, class })
    }

    fn snapshot(&self) -> FabricSnapshot {
        FabricSnapshot {
            default_numa_node: self.default_numa_node,
            interfaces: self
                .numa_fabric
                .iter()
                .map(|(&node, devices)| (node, devices.iter().map(|d| (**d).clone()).collect()))
                .collect(),
        }
    }
}

/// Fabric cache built from the local hardware scan.
pub struct LocalFabricCache {
    alias_resolver: Arc<dyn DeviceAliasResolver>,
    state: Mutex<State>,
}

impl LocalFabricCache {
    pub fn new(alias_resolver: Arc<dyn DeviceAliasResolver>) -> Self {
        Self {
            alias_resolver,
            state: Mutex::new(State::default()),
        }
    }

    /// Build a fresh state from a scan. Alias lookups happen here, before the
    /// cache lock is taken.
    async fn build_state(&self, scan: Vec<FabricScanEntry>) -> State {
        let mut numa_fabric: HashMap<NumaNode, Vec<Arc<FabricInterface>>> = HashMap::new();
        let mut default_numa_node: NumaNode = 0;

        for entry in scan {
            if entry.device_name == LOOPBACK_DEVICE {
                continue;
            }

            let alias = match self.alias_resolver.resolve(&entry.device_name).await {
                Ok(alias) => alias,
                Err(err) => {
                    debug!(
                        device = %entry.device_name,
                        error = %err,
                        "non-fatal error: failed to get device alias"
                    );
                    String::new()
                }
            };

            let numa_node = entry.numa_node;
            let devices = numa_fabric.entry(numa_node).or_default();
            devices.push(Arc::new(FabricInterface::new(
                entry.device_name,
                alias,
                entry.net_dev_class,
            )));

            // Last write wins: the default ends up as the NUMA node of the
            // final scan entry.
            default_numa_node = numa_node;

            if let Some(added) = devices.last() {
                debug!(
                    device = %added.name,
                    alias = %added.alias,
                    numa_node,
                    device_index = devices.len() - 1,
                    "added fabric device"
                );
            }
        }

        debug!(default_numa_node, "default NUMA node selected");

        if !numa_fabric.contains_key(&default_numa_node) {
            info!(
                numa_node = default_numa_node,
                device = DEFAULT_NETWORK_DEVICE,
                "no network devices detected, default attach info response may be incorrect"
            );
            numa_fabric.insert(
                default_numa_node,
                vec![Arc::new(FabricInterface::new(
                    DEFAULT_NETWORK_DEVICE,
                    "",
                    NetDevClass::Loopback,
                ))],
            );
        }

        State {
            initialized: true,
            numa_fabric,
            cursors: HashMap::new(),
            default_numa_node,
        }
    }
}

impl std::fmt::Debug for LocalFabricCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFabricCache").finish_non_exhaustive()
    }
}

#[async_trait]
impl FabricDeviceSelector for LocalFabricCache {
    async fn is_cached(&self) -> bool {
        self.state.lock().await.initialized
    }

    async fn populate(&self, scan: Vec<FabricScanEntry>) -> DomainResult<()> {
        let fresh = self.build_state(scan).await;
        *self.state.lock().await = fresh;
        Ok(())
    }

    async fn get_device(
        &self,
        numa_node: NumaNode,
        class: NetDevClass,
    ) -> DomainResult<Arc<FabricInterface>> {
        self.state.lock().await.get_device(numa_node, class)
    }

    async fn snapshot(&self) -> DomainResult<FabricSnapshot> {
        let state = self.state.lock().await;
        if !state.initialized {
            return Err(DomainError::NotCached);
        }
        Ok(state.snapshot())
    }
}

#[async_trait]
impl<T: FabricDeviceSelector + ?Sized> FabricDeviceSelector for Arc<T> {
    async fn is_cached(&self) -> bool {
        (**self).is_cached().await
    }

    async fn populate(&self, scan: Vec<FabricScanEntry>) -> DomainResult<()> {
        (**self).populate(scan).await
    }

    async fn get_device(
        &self,
        numa_node: NumaNode,
        class: NetDevClass,
    ) -> DomainResult<Arc<FabricInterface>> {
        (**self).get_device(numa_node, class).await
    }

    async fn snapshot(&self) -> DomainResult<FabricSnapshot> {
        (**self).snapshot().await
    }
}

#[async_trait]
impl<T: FabricDeviceSelector> FabricDeviceSelector for Option<T> {
    async fn is_cached(&self) -> bool {
        match self {
            Some(cache) => cache.is_cached().await,
            None => false,
        }
    }

    async fn populate(&self, scan: Vec<FabricScanEntry>) -> DomainResult<()> {
        match self {
            Some(cache) => cache.populate(scan).await,
            None => Err(DomainError::CacheAbsent("fabric cache")),
        }
    }

    async fn get_device(
        &self,
        numa_node: NumaNode,
        class: NetDevClass,
    ) -> DomainResult<Arc<FabricInterface>> {
        match self {
            Some(cache) => cache.get_device(numa_node, class).await,
            None => Err(DomainError::CacheAbsent("fabric cache")),
        }
    }

    async fn snapshot(&self) -> DomainResult<FabricSnapshot> {
        match self {
            Some(cache) => cache.snapshot().await,
            None => Err(DomainError::CacheAbsent("fabric cache")),
        }
    }
}
