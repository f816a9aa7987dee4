//! Dynamic Datasource - Main entry point.
//!
//! Provisions the declared datasources, publishes the routing table and keeps the
//! pools open until Ctrl-C.

use clap::Parser;
use dynamic_datasource::config::{Config, DeclarationSource};
use dynamic_datasource::db::{
    DbPool, MergePolicy, PoolProvisioner, RegistryAssembler, RoutingTable, SqlxPoolFactory,
};
use dynamic_datasource::DatasourceBootstrap;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    info!("Starting dynamic-datasource v{}", env!("CARGO_PKG_VERSION"));

    let declarations = config.load()?;

    let merge_policy = if config.strict_names {
        MergePolicy::Strict
    } else {
        MergePolicy::LastWriteWins
    };
    let bootstrap = DatasourceBootstrap::new(
        PoolProvisioner::new(SqlxPoolFactory::new()),
        RegistryAssembler::new(merge_policy),
    );
    let routing_table: RoutingTable<DbPool> = RoutingTable::new();

    let outcome = match bootstrap.run(&declarations, &routing_table).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, suggestion = ?e.suggestion(), "Datasource startup failed");
            return Err(e.into());
        }
    };

    match &outcome {
        Some(outcome) => println!("{}", serde_json::to_string_pretty(outcome)?),
        None => info!("Running without a managed datasource"),
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    routing_table.close_all().await;
    info!("Shutdown complete");
    Ok(())
}
