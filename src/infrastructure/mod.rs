//! Infrastructure layer module
//!
//! Process-level concerns that sit outside the caches:
//! - Configuration management
//! - Logging infrastructure
//! - Wiring of the request handler from configuration

pub mod config;
pub mod logging;
pub mod setup;
