//! Process-wide default write datasource name.
//!
//! Kept for routers that look the default up globally instead of receiving a
//! [`BootstrapOutcome`](crate::bootstrap::BootstrapOutcome). Only
//! [`DatasourceBootstrap::run`](crate::bootstrap::DatasourceBootstrap::run) writes it,
//! after a successful publication with a declared default. A fallback default is not
//! recorded.

use std::sync::{PoisonError, RwLock};

static DEFAULT_WRITE_DATASOURCE: RwLock<Option<String>> = RwLock::new(None);

/// Record the default write datasource name, replacing any earlier one.
pub(crate) fn set_default_write_datasource(name: &str) {
    let mut current = DEFAULT_WRITE_DATASOURCE
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *current = Some(name.to_string());
}

/// The recorded default write datasource name, if startup has set one.
pub fn default_write_datasource() -> Option<String> {
    DEFAULT_WRITE_DATASOURCE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only unit test touching the global.
    #[test]
    fn test_last_write_wins() {
        set_default_write_datasource("master");
        assert_eq!(default_write_datasource().as_deref(), Some("master"));
        set_default_write_datasource("other");
        assert_eq!(default_write_datasource().as_deref(), Some("other"));
    }
}
