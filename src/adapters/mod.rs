//! Adapters implementing the domain ports.

pub mod attach_info;
pub mod fabric;
