//! Startup pipeline: declarations → pools → registry → sink.

use crate::db::assembler::RegistryAssembler;
use crate::db::pool::PoolFactory;
use crate::db::provisioner::PoolProvisioner;
use crate::db::registry::DefaultSource;
use crate::context;
use crate::db::sink::RegistrationSink;
use crate::error::DatasourceResult;
use crate::models::Declarations;
use serde::Serialize;
use tracing::{info, warn};

/// Result of a successful publication, threaded to whatever routes queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapOutcome {
    pub default_name: String,
    pub default_source: DefaultSource,
    /// Registered names, sorted.
    pub datasources: Vec<String>,
}

/// Runs the provisioning pipeline once at startup.
#[derive(Debug, Clone)]
pub struct DatasourceBootstrap<F> {
    provisioner: PoolProvisioner<F>,
    assembler: RegistryAssembler,
}

impl<F: PoolFactory> DatasourceBootstrap<F> {
    pub fn new(provisioner: PoolProvisioner<F>, assembler: RegistryAssembler) -> Self {
        Self {
            provisioner,
            assembler,
        }
    }

    pub fn provisioner(&self) -> &PoolProvisioner<F> {
        &self.provisioner
    }

    /// Provision every declaration, assemble the registry and publish it to `sink`.
    ///
    /// Returns `Ok(None)` without touching the sink when nothing is declared. Any other
    /// failure aborts before publication. A declared default is recorded in
    /// [`context`] once the sink has accepted the registry.
    pub async fn run<S>(
        &self,
        declarations: &Declarations,
        sink: &S,
    ) -> DatasourceResult<Option<BootstrapOutcome>>
    where
        S: RegistrationSink<F::Pool>,
    {
        let explicit_default = declarations.explicit_default()?;

        let pools = match self.provisioner.provision(declarations).await {
            Ok(pools) => pools,
            Err(e) if !e.is_fatal() => {
                warn!(error = %e, "Skipping datasource registration");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let registry = self.assembler.assemble(pools, explicit_default)?;
        let outcome = BootstrapOutcome {
            default_name: registry.default_name().to_string(),
            default_source: registry.default_source(),
            datasources: registry.names(),
        };

        sink.publish(registry).await?;

        if outcome.default_source == DefaultSource::Declared {
            context::set_default_write_datasource(&outcome.default_name);
            info!(datasource = %outcome.default_name, "Default write datasource recorded");
        }
        Ok(Some(outcome))
    }
}
