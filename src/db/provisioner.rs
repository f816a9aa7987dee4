//! Pool provisioner.
//!
//! Opens one pool per declaration and partitions the handles by role. Pool creation
//! runs concurrently; the caller only ever sees the complete pair of mappings or an error.

use crate::db::pool::PoolFactory;
use crate::error::{DatasourceError, DatasourceResult};
use crate::models::{Declarations, Role};
use futures_util::future::try_join_all;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Provisioned pools, partitioned by role and keyed by datasource name.
#[derive(Debug)]
pub struct ProvisionedPools<P> {
    pub write: BTreeMap<String, P>,
    pub read: BTreeMap<String, P>,
}

impl<P> ProvisionedPools<P> {
    pub fn len(&self) -> usize {
        self.write.len() + self.read.len()
    }

    pub fn is_empty(&self) -> bool {
        self.write.is_empty() && self.read.is_empty()
    }
}

impl<P> Default for ProvisionedPools<P> {
    fn default() -> Self {
        Self {
            write: BTreeMap::new(),
            read: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PoolProvisioner<F> {
    factory: F,
}

impl<F: PoolFactory> PoolProvisioner<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Create a pool for every declaration and route it by role.
    ///
    /// Returns [`DatasourceError::NoDatasource`] when nothing is declared. The first
    /// factory failure is returned unchanged; pools already opened are dropped.
    pub async fn provision(
        &self,
        declarations: &Declarations,
    ) -> DatasourceResult<ProvisionedPools<F::Pool>> {
        if declarations.is_empty() {
            return Err(DatasourceError::NoDatasource);
        }

        info!(count = declarations.len(), "Provisioning datasources");

        let created = try_join_all(declarations.iter().map(|declaration| async move {
            debug!(
                datasource = %declaration.name,
                role = %declaration.role,
                db_type = %declaration.params.db_type,
                url = %declaration.params.masked_connection_string(),
                "Creating pool"
            );
            let pool = self.factory.create_pool(&declaration.params).await?;
            info!(
                datasource = %declaration.name,
                role = %declaration.role,
                "Datasource connected"
            );
            Ok::<_, DatasourceError>((declaration.name.clone(), declaration.role, pool))
        }))
        .await?;

        let mut pools = ProvisionedPools::default();
        for (name, role, pool) in created {
            match role {
                Role::Write => pools.write.insert(name, pool),
                Role::Read => pools.read.insert(name, pool),
            };
        }
        Ok(pools)
    }
}
