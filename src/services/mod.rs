//! Agent services: the two caches and the request handler composing them.

pub mod attach_info_cache;
pub mod attach_info_service;
pub mod fabric_cache;

pub use attach_info_cache::{AttachInfoCache, ResponseCache};
pub use attach_info_service::AttachInfoService;
pub use fabric_cache::{FabricDeviceSelector, FabricSnapshot, LocalFabricCache};
