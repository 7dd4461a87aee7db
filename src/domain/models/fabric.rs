//! Fabric interface value types.
//!
//! A NUMA node is a signed integer so that a sentinel (`-1`) can stand for
//! "no NUMA affinity", matching what the kernel reports for such devices.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// NUMA node identifier.
pub type NumaNode = i32;

/// Device name of the loopback interface, dropped from scan results.
pub const LOOPBACK_DEVICE: &str = "lo";

/// Device handed out when a scan yields nothing for the default NUMA node.
pub const DEFAULT_NETWORK_DEVICE: &str = "lo";

/// Network device class, expressed as the ARP hardware type of the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum NetDevClass {
    /// Ethernet (`ARPHRD_ETHER`), served by socket-style providers.
    #[default]
    Ether,
    /// InfiniBand (`ARPHRD_INFINIBAND`), served by verbs-capable providers.
    Infiniband,
    /// Loopback (`ARPHRD_LOOPBACK`).
    Loopback,
    /// Any other hardware type, kept by raw value.
    Other(u32),
}

impl NetDevClass {
    /// Raw ARP hardware type value.
    pub const fn raw(self) -> u32 {
        match self {
            Self::Ether => 1,
            Self::Infiniband => 32,
            Self::Loopback => 772,
            Self::Other(value) => value,
        }
    }

    /// Build a class from a raw ARP hardware type value.
    pub const fn from_raw(value: u32) -> Self {
        match value {
            1 => Self::Ether,
            32 => Self::Infiniband,
            772 => Self::Loopback,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for NetDevClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ether => f.write_str("ether"),
            Self::Infiniband => f.write_str("infiniband"),
            Self::Loopback => f.write_str("loopback"),
            Self::Other(value) => write!(f, "unknown({value})"),
        }
    }
}

impl FromStr for NetDevClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "ether" | "ethernet" => Ok(Self::Ether),
            "infiniband" | "ib" => Ok(Self::Infiniband),
            "loopback" => Ok(Self::Loopback),
            _ => {
                let raw = trimmed
                    .strip_prefix("unknown(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .unwrap_or(trimmed);
                raw.parse::<u32>()
                    .map(Self::from_raw)
                    .map_err(|_| DomainError::InvalidNetDevClass(s.to_string()))
            }
        }
    }
}

impl From<NetDevClass> for String {
    fn from(class: NetDevClass) -> Self {
        class.to_string()
    }
}

impl TryFrom<String> for NetDevClass {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One raw entry produced by a hardware fabric scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricScanEntry {
    pub device_name: String,
    pub numa_node: NumaNode,
    pub net_dev_class: NetDevClass,
}

impl FabricScanEntry {
    pub fn new(
        device_name: impl Into<String>,
        numa_node: NumaNode,
        net_dev_class: NetDevClass,
    ) -> Self {
        Self {
            device_name: device_name.into(),
            numa_node,
            net_dev_class,
        }
    }
}

/// Immutable snapshot of one discovered network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricInterface {
    /// Device identifier as known to the fabric layer.
    pub name: String,
    /// OS-level alias; empty when resolution failed.
    #[serde(default)]
    pub alias: String,
    pub net_dev_class: NetDevClass,
}

impl FabricInterface {
    pub fn new(
        name: impl Into<String>,
        alias: impl Into<String>,
        net_dev_class: NetDevClass,
    ) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            net_dev_class,
        }
    }

    /// Alias if one was resolved, otherwise the device name.
    pub fn domain(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }
}
