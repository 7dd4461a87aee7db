//! Fabric scan and alias adapters.

pub mod snapshot_scanner;
pub mod static_alias;

pub use snapshot_scanner::{ScanRecord, SnapshotFabricScanner};
pub use static_alias::StaticAliasResolver;
