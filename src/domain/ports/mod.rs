//! Port trait definitions (Hexagonal Architecture)
//!
//! Async interfaces for the collaborators the agent depends on but does not
//! implement itself:
//! - AttachInfoSource: remote attach info fetch from the management service
//! - FabricScanner: hardware probe enumerating fabric interfaces
//! - DeviceAliasResolver: OS-level alias lookup for a fabric device
pub mod attach_info_source;
pub mod device_alias;
pub mod fabric_scanner;
pub mod null_alias;

pub use attach_info_source::AttachInfoSource;
pub use device_alias::DeviceAliasResolver;
pub use fabric_scanner::FabricScanner;
pub use null_alias::NullAliasResolver;
