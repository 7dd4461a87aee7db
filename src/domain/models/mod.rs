pub mod attach_info;
pub mod config;
pub mod fabric;

pub use attach_info::{AttachInfoResponse, RankUri};
pub use config::{
    AttachInfoConfig, CacheConfig, Config, FabricConfig, LoggingConfig, RetryConfig,
};
pub use fabric::{
    FabricInterface, FabricScanEntry, NetDevClass, NumaNode, DEFAULT_NETWORK_DEVICE,
    LOOPBACK_DEVICE,
};
