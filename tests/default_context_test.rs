//! Process-wide default write datasource after startup.
//!
//! Kept in its own test binary: the recorded name is global to the process.

use dynamic_datasource::config::DatasourceArg;
use dynamic_datasource::context::default_write_datasource;
use dynamic_datasource::db::{
    DbPool, PoolProvisioner, RegistryAssembler, RoutingTable, SqlxPoolFactory,
};
use dynamic_datasource::models::Declarations;
use dynamic_datasource::{DatasourceBootstrap, DatasourceError};
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

fn sqlx_bootstrap() -> DatasourceBootstrap<SqlxPoolFactory> {
    DatasourceBootstrap::new(
        PoolProvisioner::new(SqlxPoolFactory::new()),
        RegistryAssembler::default(),
    )
}

fn declarations(args: &[String]) -> Declarations {
    let mut declarations = Declarations::new();
    for arg in args {
        declarations.insert(DatasourceArg::parse(arg).unwrap()).unwrap();
    }
    declarations
}

#[tokio::test]
async fn test_default_recorded_only_after_successful_run() {
    let dir = TempDir::new().unwrap();
    let master = format!(
        "master=sqlite:{}?default=true",
        dir.path().join("master.db").display()
    );
    let fallback_only = format!("primary=sqlite:{}", dir.path().join("primary.db").display());
    let broken = format!(
        "broken=sqlite:{}?role=read&read_only=true",
        dir.path().join("missing").join("nested.db").display()
    );

    // Factory failure leaves the default unset
    let table: RoutingTable<DbPool> = RoutingTable::new();
    let err = assert_err!(
        sqlx_bootstrap()
            .run(&declarations(&[master.clone(), broken]), &table)
            .await
    );
    assert!(matches!(err, DatasourceError::Connection { .. }));
    assert_eq!(default_write_datasource(), None);

    // A fallback default is not recorded
    let table: RoutingTable<DbPool> = RoutingTable::new();
    assert_ok!(sqlx_bootstrap().run(&declarations(&[fallback_only]), &table).await);
    assert_eq!(table.default_name().await.unwrap(), "primary");
    assert_eq!(default_write_datasource(), None);
    table.close_all().await;

    let table: RoutingTable<DbPool> = RoutingTable::new();
    assert_ok!(sqlx_bootstrap().run(&declarations(&[master]), &table).await);
    assert_eq!(default_write_datasource().as_deref(), Some("master"));
    table.close_all().await;
}
