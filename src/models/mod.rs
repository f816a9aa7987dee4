//! Data models for datasource provisioning.
//!
//! This module re-exports the declaration types produced by declaration sources
//! and consumed by the pool provisioner.

pub mod declaration;

// Re-export commonly used types
pub use declaration::{ConnectionParams, DatabaseType, Declaration, Declarations, Role};
