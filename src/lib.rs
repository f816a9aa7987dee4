//! Dynamic Datasource Library
//!
//! Provisions named database pools from declarations at startup, partitions them into
//! write and read roles, resolves the default write pool and publishes a single
//! registry for routers to look pools up by name.

pub mod bootstrap;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod models;

pub use bootstrap::{BootstrapOutcome, DatasourceBootstrap};
pub use config::{Config, DeclarationSource};
pub use error::{DatasourceError, DatasourceResult};
