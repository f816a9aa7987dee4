//! Registry assembler.
//!
//! Resolves the default write pool and merges the write and read mappings into one
//! [`Registry`].
//!
//! # Default resolution
//!
//! 1. A declared default must name a provisioned **write** pool, otherwise assembly fails
//!    with [`DatasourceError::DefaultNotFound`]. A default whose only declaration has role
//!    read therefore fails too.
//! 2. Without a declared default, the write pool whose name sorts first is chosen. No
//!    write pools at all fails with [`DatasourceError::NoWriteDatasource`].
//!
//! # Merge
//!
//! Read pools are overlaid on write pools. Under [`MergePolicy::LastWriteWins`] a read
//! pool replaces a write pool of the same name in the registry; the default pool is
//! resolved before the merge and is unaffected. [`MergePolicy::Strict`] rejects the
//! collision instead.

use crate::db::provisioner::ProvisionedPools;
use crate::db::registry::{DefaultSource, RegisteredPool, Registry};
use crate::error::{DatasourceError, DatasourceResult};
use crate::models::Role;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

/// What to do when a name is provisioned under both roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// The read pool replaces the write pool in the registry.
    #[default]
    LastWriteWins,
    /// Fail with [`DatasourceError::NameCollision`].
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct RegistryAssembler {
    merge_policy: MergePolicy,
}

impl RegistryAssembler {
    pub fn new(merge_policy: MergePolicy) -> Self {
        Self { merge_policy }
    }

    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    /// Pick the default write datasource name.
    pub fn resolve_default<'a, P>(
        &self,
        write: &'a BTreeMap<String, P>,
        explicit_default: Option<&str>,
    ) -> DatasourceResult<(&'a str, DefaultSource)> {
        match explicit_default {
            Some(name) => write
                .get_key_value(name)
                .map(|(name, _)| (name.as_str(), DefaultSource::Declared))
                .ok_or_else(|| DatasourceError::default_not_found(name)),
            None => write
                .keys()
                .next()
                .map(|name| (name.as_str(), DefaultSource::Fallback))
                .ok_or(DatasourceError::NoWriteDatasource),
        }
    }

    /// Build the registry from provisioned pools.
    pub fn assemble<P: Clone>(
        &self,
        pools: ProvisionedPools<P>,
        explicit_default: Option<&str>,
    ) -> DatasourceResult<Registry<P>> {
        let (default_name, default_source) =
            self.resolve_default(&pools.write, explicit_default)?;
        let default_name = default_name.to_string();
        let default_pool = pools.write[&default_name].clone();

        if self.merge_policy == MergePolicy::Strict {
            if let Some(name) = pools.read.keys().find(|name| pools.write.contains_key(*name)) {
                return Err(DatasourceError::name_collision(name.clone()));
            }
        }

        let mut merged: HashMap<String, RegisteredPool<P>> = pools
            .write
            .into_iter()
            .map(|(name, pool)| {
                (
                    name,
                    RegisteredPool {
                        pool,
                        role: Role::Write,
                    },
                )
            })
            .collect();

        for (name, pool) in pools.read {
            let replaced = merged.insert(
                name.clone(),
                RegisteredPool {
                    pool,
                    role: Role::Read,
                },
            );
            if replaced.is_some() {
                warn!(
                    datasource = %name,
                    "Read datasource replaces write datasource with the same name"
                );
            }
        }

        info!(
            datasources = merged.len(),
            default = %default_name,
            default_source = ?default_source,
            "Datasource registry assembled"
        );

        Ok(Registry::new(
            merged,
            default_name,
            default_pool,
            default_source,
        ))
    }
}
