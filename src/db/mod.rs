//! Datasource provisioning.
//!
//! This module provides the pool factory, the provisioner that opens pools per
//! declaration, the assembler that builds the registry, and the sink it is published to.

pub mod assembler;
pub mod pool;
pub mod provisioner;
pub mod registry;
pub mod sink;

pub use assembler::{MergePolicy, RegistryAssembler};
pub use pool::{DbPool, PoolFactory, SqlxPoolFactory};
pub use provisioner::{PoolProvisioner, ProvisionedPools};
pub use registry::{DatasourceSummary, DefaultSource, RegisteredPool, Registry};
pub use sink::{RegistrationSink, RoutingTable};
