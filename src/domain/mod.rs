//! Domain layer for the attach agent
//!
//! This module contains the value types, errors and collaborator ports the
//! caches and request handler are built on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
