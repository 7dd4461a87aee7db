//! Attach info returned by the cluster management service.
//!
//! The caches treat a response as an opaque unit. Only the request handler
//! reads into it, to pick the provider for a scan and to substitute the
//! selected interface.

use serde::{Deserialize, Serialize};

use super::fabric::{FabricInterface, NetDevClass};

/// URI at which one engine rank can be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankUri {
    pub rank: u32,
    pub uri: String,
}

/// Connection parameters a client needs to join the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AttachInfoResponse {
    /// Status code reported by the management service.
    #[serde(default)]
    pub status: i32,

    /// Engine rank URIs.
    #[serde(default)]
    pub rank_uris: Vec<RankUri>,

    /// Ranks hosting a management service replica.
    #[serde(default)]
    pub ms_ranks: Vec<u32>,

    /// Fabric provider, e.g. `ofi+verbs;ofi_rxm`.
    #[serde(default)]
    pub provider: String,

    /// Fabric interface the client should bind to.
    #[serde(default)]
    pub interface: String,

    /// Fabric domain for the interface.
    #[serde(default)]
    pub domain: String,

    #[serde(default)]
    pub crt_ctx_share_addr: u32,

    #[serde(default)]
    pub crt_timeout: u32,

    /// Device class the engines were configured with.
    #[serde(default)]
    pub net_dev_class: NetDevClass,
}

impl AttachInfoResponse {
    /// A response carrying no provider and no way to reach any rank.
    pub fn is_empty(&self) -> bool {
        self.provider.is_empty() && self.rank_uris.is_empty() && self.ms_ranks.is_empty()
    }

    /// Copy of this response recommending the given interface.
    pub fn with_interface(&self, fabric_if: &FabricInterface) -> Self {
        Self {
            interface: fabric_if.name.clone(),
            domain: fabric_if.domain().to_string(),
            ..self.clone()
        }
    }
}
