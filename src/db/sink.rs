//! Registration sink.
//!
//! The assembled [`Registry`] is handed to a [`RegistrationSink`] exactly once.
//! [`RoutingTable`] is the in-process sink that routers query by name.

use crate::db::pool::DbPool;
use crate::db::registry::{DatasourceSummary, Registry};
use crate::error::{DatasourceError, DatasourceResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Makes a published registry available to the rest of the application.
pub trait RegistrationSink<P> {
    fn publish(&self, registry: Registry<P>) -> impl Future<Output = DatasourceResult<()>> + Send;
}

/// Lookup-by-name routing facility over a published registry.
#[derive(Debug)]
pub struct RoutingTable<P> {
    registry: Arc<RwLock<Option<Registry<P>>>>,
}

impl<P> Clone for RoutingTable<P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<P: Clone + Send + Sync> RoutingTable<P> {
    /// Create an empty, unpublished routing table.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn is_published(&self) -> bool {
        self.registry.read().await.is_some()
    }

    /// Get a pool by datasource name.
    pub async fn get_pool(&self, name: &str) -> DatasourceResult<P> {
        let registry = self.registry.read().await;
        let registry = registry.as_ref().ok_or(DatasourceError::NotPublished)?;
        registry
            .get(name)
            .cloned()
            .ok_or_else(|| DatasourceError::datasource_not_found(name))
    }

    /// Get the default write pool.
    pub async fn default_pool(&self) -> DatasourceResult<P> {
        let registry = self.registry.read().await;
        registry
            .as_ref()
            .map(|r| r.default_pool().clone())
            .ok_or(DatasourceError::NotPublished)
    }

    /// Name of the default write datasource.
    pub async fn default_name(&self) -> DatasourceResult<String> {
        let registry = self.registry.read().await;
        registry
            .as_ref()
            .map(|r| r.default_name().to_string())
            .ok_or(DatasourceError::NotPublished)
    }

    /// List registered datasources, sorted by name. Empty before publication.
    pub async fn list_datasources(&self) -> Vec<DatasourceSummary> {
        let registry = self.registry.read().await;
        registry.as_ref().map(Registry::summaries).unwrap_or_default()
    }
}

impl<P: Clone + Send + Sync> Default for RoutingTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone + Send + Sync> RegistrationSink<P> for RoutingTable<P> {
    async fn publish(&self, registry: Registry<P>) -> DatasourceResult<()> {
        let mut slot = self.registry.write().await;
        if slot.is_some() {
            return Err(DatasourceError::AlreadyPublished);
        }
        info!(
            datasources = registry.len(),
            default = %registry.default_name(),
            "Datasource registry published"
        );
        *slot = Some(registry);
        Ok(())
    }
}

impl RoutingTable<DbPool> {
    /// Close every pool and clear the table.
    pub async fn close_all(&self) {
        let registry = self.registry.write().await.take();
        let Some(registry) = registry else {
            return;
        };

        let (pools, default_pool) = registry.into_parts();
        for (name, entry) in pools {
            info!(datasource = %name, role = %entry.role, "Closing datasource");
            entry.pool.close().await;
        }
        // Already closed unless a read datasource replaced it under the same name
        default_pool.close().await;
        info!("All datasources closed");
    }
}
