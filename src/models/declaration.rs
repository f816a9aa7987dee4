//! Datasource declaration models.
//!
//! A [`Declaration`] is the normalized description of one configured datasource.
//! [`Declarations`] is what a declaration source hands to the provisioner.

use crate::config::PoolOptions;
use crate::error::{DatasourceError, DatasourceResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Supported database types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    PostgreSQL,
    /// Includes MariaDB
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// Parse database type from a connection string.
    pub fn from_connection_string(connection_string: &str) -> Option<Self> {
        let lower = connection_string.to_lowercase();
        if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
            Some(Self::PostgreSQL)
        } else if lower.starts_with("mysql://") || lower.starts_with("mariadb://") {
            Some(Self::MySQL)
        } else if lower.starts_with("sqlite://") || lower.starts_with("sqlite:") {
            Some(Self::SQLite)
        } else {
            None
        }
    }

    /// Get the display name for this database type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PostgreSQL => "PostgreSQL",
            Self::MySQL => "MySQL",
            Self::SQLite => "SQLite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Routing role of a datasource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Write,
    Read,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write => write!(f, "write"),
            Self::Read => write!(f, "read"),
        }
    }
}

impl FromStr for Role {
    type Err = DatasourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("write") {
            Ok(Self::Write)
        } else if s.eq_ignore_ascii_case("read") {
            Ok(Self::Read)
        } else {
            Err(DatasourceError::invalid_declaration(format!(
                "Unknown role '{s}', expected 'write' or 'read'"
            )))
        }
    }
}

/// Connection parameters handed verbatim to the pool factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub db_type: DatabaseType,
    /// Contains sensitive data - never log
    #[serde(skip_serializing)]
    pub connection_string: String,
    #[serde(default)]
    pub pool_options: PoolOptions,
}

impl ConnectionParams {
    pub fn new(
        connection_string: impl Into<String>,
        pool_options: PoolOptions,
    ) -> DatasourceResult<Self> {
        let connection_string = connection_string.into();
        let db_type = DatabaseType::from_connection_string(&connection_string).ok_or_else(|| {
            DatasourceError::invalid_declaration(format!(
                "Unknown database type in connection string: {}",
                mask(&connection_string)
            ))
        })?;
        pool_options
            .validate()
            .map_err(DatasourceError::invalid_declaration)?;

        Ok(Self {
            db_type,
            connection_string,
            pool_options,
        })
    }

    /// Get a display-safe version of the connection string (credentials masked).
    pub fn masked_connection_string(&self) -> String {
        mask(&self.connection_string)
    }
}

fn mask(connection_string: &str) -> String {
    if let Some(at_pos) = connection_string.find('@') {
        if let Some(colon_pos) = connection_string[..at_pos].rfind(':') {
            // "scheme://user@host" has its only colon in the scheme separator
            if !connection_string[colon_pos..].starts_with("://") {
                let prefix = &connection_string[..colon_pos + 1];
                let suffix = &connection_string[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
    }
    connection_string.to_string()
}

/// One named datasource entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub role: Role,
    pub params: ConnectionParams,
    #[serde(default)]
    pub is_default: bool,
}

impl Declaration {
    /// Create a new declaration, validating the name.
    pub fn new(
        name: impl Into<String>,
        role: Role,
        params: ConnectionParams,
        is_default: bool,
    ) -> DatasourceResult<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(DatasourceError::invalid_declaration(
                "Datasource name cannot be empty",
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DatasourceError::invalid_declaration(format!(
                "Datasource name contains invalid characters: {name}"
            )));
        }

        Ok(Self {
            name,
            role,
            params,
            is_default,
        })
    }
}

/// The declaration set produced by a declaration source.
///
/// Names are unique per role. The same name under both roles is accepted here and
/// resolved by the assembler's merge policy.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    entries: Vec<Declaration>,
    /// Marker-level default write name, independent of per-entry flags.
    default_write: Option<String>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration. Fails if the name is already declared with the same role.
    pub fn insert(&mut self, declaration: Declaration) -> DatasourceResult<()> {
        if self
            .entries
            .iter()
            .any(|d| d.name == declaration.name && d.role == declaration.role)
        {
            return Err(DatasourceError::duplicate_declaration(
                declaration.name,
                declaration.role,
            ));
        }
        self.entries.push(declaration);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, declaration: Declaration) -> DatasourceResult<Self> {
        self.insert(declaration)?;
        Ok(self)
    }

    /// Name the default write datasource without flagging an entry.
    pub fn set_default_write(&mut self, name: impl Into<String>) {
        self.default_write = Some(name.into());
    }

    pub fn default_write(&self) -> Option<&str> {
        self.default_write.as_deref()
    }

    /// Merge another declaration set into this one.
    pub fn extend(&mut self, other: Declarations) -> DatasourceResult<()> {
        for declaration in other.entries {
            self.insert(declaration)?;
        }
        if let Some(name) = other.default_write {
            match &self.default_write {
                Some(existing) if *existing != name => {
                    return Err(DatasourceError::MultipleDefaults {
                        names: vec![existing.clone(), name],
                    });
                }
                _ => self.default_write = Some(name),
            }
        }
        Ok(())
    }

    /// The single name marked as default, if any.
    ///
    /// Entry flags and the marker-level default may name the same datasource; two
    /// distinct names is a configuration error. A flagged entry must have role write,
    /// even when a write entry shares its name. The marker carries no role and is
    /// resolved by name only.
    pub fn explicit_default(&self) -> DatasourceResult<Option<&str>> {
        let names: BTreeSet<&str> = self
            .entries
            .iter()
            .filter(|d| d.is_default)
            .map(|d| d.name.as_str())
            .chain(self.default_write.as_deref())
            .collect();

        if names.len() > 1 {
            return Err(DatasourceError::MultipleDefaults {
                names: names.into_iter().map(String::from).collect(),
            });
        }
        if let Some(read) = self
            .entries
            .iter()
            .find(|d| d.is_default && d.role == Role::Read)
        {
            return Err(DatasourceError::default_not_found(read.name.clone()));
        }
        Ok(names.into_iter().next())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Declarations {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
