//! The assembled datasource registry.

use crate::models::Role;
use serde::Serialize;
use std::collections::HashMap;

/// How the default write datasource was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultSource {
    /// Named by configuration.
    Declared,
    /// Picked from the write datasources because none was named.
    Fallback,
}

/// A pool in the registry together with the role it was declared with.
#[derive(Debug, Clone)]
pub struct RegisteredPool<P> {
    pub pool: P,
    pub role: Role,
}

/// Datasource information for listings (no connection strings or handles).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasourceSummary {
    pub name: String,
    pub role: Role,
    pub is_default: bool,
}

/// Name → pool mapping over write and read datasources, plus the default write pool.
///
/// The default pool is the handle provisioned for the default write datasource. When a
/// read datasource shares that name, `get(default_name)` returns the read pool while
/// `default_pool()` still returns the write one.
#[derive(Debug, Clone)]
pub struct Registry<P> {
    pools: HashMap<String, RegisteredPool<P>>,
    default_name: String,
    default_pool: P,
    default_source: DefaultSource,
}

impl<P> Registry<P> {
    pub(crate) fn new(
        pools: HashMap<String, RegisteredPool<P>>,
        default_name: String,
        default_pool: P,
        default_source: DefaultSource,
    ) -> Self {
        Self {
            pools,
            default_name,
            default_pool,
            default_source,
        }
    }

    pub fn get(&self, name: &str) -> Option<&P> {
        self.pools.get(name).map(|entry| &entry.pool)
    }

    pub fn role(&self, name: &str) -> Option<Role> {
        self.pools.get(name).map(|entry| entry.role)
    }

    pub fn default_pool(&self) -> &P {
        &self.default_pool
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn default_source(&self) -> DefaultSource {
        self.default_source
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Summaries sorted by name.
    pub fn summaries(&self) -> Vec<DatasourceSummary> {
        let mut summaries: Vec<DatasourceSummary> = self
            .pools
            .iter()
            .map(|(name, entry)| DatasourceSummary {
                name: name.clone(),
                role: entry.role,
                is_default: *name == self.default_name && entry.role == Role::Write,
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Split into the name mapping and the default pool.
    pub fn into_parts(self) -> (HashMap<String, RegisteredPool<P>>, P) {
        (self.pools, self.default_pool)
    }
}
