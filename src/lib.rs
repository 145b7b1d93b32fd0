// Scopedoc - document normalization and tenant scoping for schema-less stores
//
// Flattens typed values into ordered dotted-path documents and scopes
// arbitrary documents to a tenant before they are handed to the store.

use std::sync::Arc;

// Re-export member crates
pub use scopedoc_config as config;
pub use scopedoc_document as document;
pub use scopedoc_log as log;
pub use scopedoc_tenancy as tenancy;

// Re-export the common surface
pub use scopedoc_config::{ConfigError, ConfigManager, ScopeConfig, Validate};
pub use scopedoc_document::{
    Document, DocumentError, DocumentValue, Element, EncodeDocument, FlattenOptions, Record,
    Reflect, ToValue, Value, doc, document_from_struct, flatten, flatten_struct,
};
pub use scopedoc_log::AccessLogContext;
pub use scopedoc_tenancy::{
    Identity, TenantContext, TenantScoper, is_tenant_scoped_name, name_for_tenant,
    name_from_context, tenant_from_name,
};

/// Environment prefix read by [`Scopedoc::from_env`].
pub const ENV_PREFIX: &str = "SCOPEDOC";

/// A scoper and per-request access-log settings built from one
/// [`ScopeConfig`].
///
/// # Examples
///
/// ```
/// use scopedoc::{Scopedoc, ScopeConfig, TenantContext, doc};
///
/// let scopedoc = Scopedoc::new(ScopeConfig::new("org").with_max_errors(2)).unwrap();
/// let context = TenantContext::with_tenant("acme");
///
/// let query = scopedoc.scoper().scope_with_context(&context, doc! { "k" => "v" });
/// assert_eq!(query.keys().collect::<Vec<_>>(), vec!["k", "org"]);
///
/// let access = scopedoc.access_log();
/// assert_eq!(access.max_errors(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Scopedoc {
    config: ScopeConfig,
    scoper: TenantScoper,
}

impl Scopedoc {
    /// Validate `config` and build from it
    pub fn new(config: ScopeConfig) -> config::Result<Self> {
        config.validate()?;
        Ok(Self {
            scoper: TenantScoper::from_config(&config),
            config,
        })
    }

    /// Build from `SCOPEDOC_TENANT_FIELD` and `SCOPEDOC_MAX_ERRORS`; also
    /// reads the logging variables
    pub fn from_env() -> config::Result<Self> {
        scopedoc_log::init();
        let manager = ConfigManager::with_prefix(ENV_PREFIX);
        manager.load_env()?;
        Self::from_manager(&manager)
    }

    /// Build from an already loaded configuration manager
    pub fn from_manager(manager: &ConfigManager) -> config::Result<Self> {
        Self::new(ScopeConfig::from_manager(manager)?)
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn scoper(&self) -> &TenantScoper {
        &self.scoper
    }

    /// A fresh access-log context for one request
    pub fn access_log(&self) -> Arc<AccessLogContext> {
        Arc::new(AccessLogContext::new(self.config.max_errors))
    }
}

impl Default for Scopedoc {
    fn default() -> Self {
        let config = ScopeConfig::default();
        Self {
            scoper: TenantScoper::from_config(&config),
            config,
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::Scopedoc;
    pub use scopedoc_config::{ConfigManager, ScopeConfig};
    pub use scopedoc_document::prelude::*;
    pub use scopedoc_log::AccessLogContext;
    pub use scopedoc_tenancy::prelude::*;
}
