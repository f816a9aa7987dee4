//! Error types for datasource provisioning.
//!
//! This module defines all error types using `thiserror`. Every variant except
//! [`DatasourceError::NoDatasource`] is fatal to startup: the composition root is
//! expected to stop booting rather than run with a partially built registry.

use thiserror::Error;

use crate::models::Role;

#[derive(Error, Debug)]
pub enum DatasourceError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Invalid datasource declaration: {message}")]
    InvalidDeclaration { message: String },

    #[error("Datasource '{name}' is declared more than once with role {role}")]
    DuplicateDeclaration { name: String, role: Role },

    /// Nothing was declared. Not fatal: startup proceeds without a managed datasource.
    #[error("No datasource can be found")]
    NoDatasource,

    #[error("At most one default datasource may be declared, found: {}", .names.join(", "))]
    MultipleDefaults { names: Vec<String> },

    #[error("Default datasource '{name}' does not resolve to a provisioned write datasource")]
    DefaultNotFound { name: String },

    #[error("No usable default write datasource: every declared datasource has role read")]
    NoWriteDatasource,

    #[error("Datasource name '{name}' is declared with both write and read roles")]
    NameCollision { name: String },

    #[error("Datasource not found: {name}")]
    DatasourceNotFound { name: String },

    #[error("Datasource registry has not been published yet")]
    NotPublished,

    #[error("Datasource registry has already been published")]
    AlreadyPublished,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DatasourceError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an invalid declaration error.
    pub fn invalid_declaration(message: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            message: message.into(),
        }
    }

    pub fn duplicate_declaration(name: impl Into<String>, role: Role) -> Self {
        Self::DuplicateDeclaration {
            name: name.into(),
            role,
        }
    }

    pub fn default_not_found(name: impl Into<String>) -> Self {
        Self::DefaultNotFound { name: name.into() }
    }

    pub fn name_collision(name: impl Into<String>) -> Self {
        Self::NameCollision { name: name.into() }
    }

    /// Create a datasource not found error.
    pub fn datasource_not_found(name: impl Into<String>) -> Self {
        Self::DatasourceNotFound { name: name.into() }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::DefaultNotFound { .. } => {
                Some("Mark a datasource with role write as default, or fix the default name")
            }
            Self::NoWriteDatasource => Some("Declare at least one datasource with role write"),
            Self::NameCollision { .. } => {
                Some("Give the read datasource a name distinct from every write datasource")
            }
            _ => None,
        }
    }

    /// Whether this error must stop application startup.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NoDatasource)
    }
}

/// Result type alias for datasource operations.
pub type DatasourceResult<T> = Result<T, DatasourceError>;
