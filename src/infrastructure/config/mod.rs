//! Agent configuration
//!
//! Defaults are overlaid by `attach-agent.yaml` (or the file given with
//! `--config`) and then by `ATTACH_AGENT_*` environment variables, with `__`
//! separating nested keys (`ATTACH_AGENT_CACHE__ENABLED=false`).

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, DEFAULT_CONFIG_FILE, ENV_PREFIX};
