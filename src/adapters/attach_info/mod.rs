//! Attach info sources.

pub mod snapshot_source;

pub use snapshot_source::SnapshotAttachInfoSource;
