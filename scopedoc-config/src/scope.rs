//! Scoping configuration
//!
//! Settings shared by the tenant scoper and the access-log context.

use crate::validation::{ConfigValidator, Validate};
use crate::{ConfigManager, Result};
use serde::{Deserialize, Serialize};

/// Default name of the tenant discriminator field.
pub const DEFAULT_TENANT_FIELD: &str = "tenant_id";

/// Default number of errors kept per request in the access log.
pub const DEFAULT_MAX_ERRORS: usize = 5;

/// Configuration for tenant scoping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Name of the discriminator field injected into scoped documents
    pub tenant_field: String,

    /// Errors retained per request by the access-log context (0 = unbounded)
    pub max_errors: usize,
}

impl ScopeConfig {
    /// Create a config with the given discriminator field
    pub fn new(tenant_field: impl Into<String>) -> Self {
        Self {
            tenant_field: tenant_field.into(),
            ..Self::default()
        }
    }

    /// Set the per-request error cap
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Read the config from a manager, falling back to defaults for
    /// missing keys, then validate it.
    ///
    /// Values loaded from the environment arrive as strings, so numeric
    /// keys accept both `3` and `"3"`.
    pub fn from_manager(manager: &ConfigManager) -> Result<Self> {
        let defaults = Self::default();

        let tenant_field = manager.get_or("tenant_field", defaults.tenant_field);
        let max_errors = match manager.get::<usize>("max_errors") {
            Ok(n) => n,
            Err(_) => manager
                .get::<String>("max_errors")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_errors),
        };

        let config = Self {
            tenant_field,
            max_errors,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            tenant_field: DEFAULT_TENANT_FIELD.to_string(),
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

impl Validate for ScopeConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::document_key(&self.tenant_field, "tenant_field")
    }
}
