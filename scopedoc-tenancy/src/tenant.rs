//! Tenant Context
//!
//! Request-scoped tenant information.

use crate::identity::Identity;

/// Tenant context stored in a request
///
/// Holds the caller's identity when one was extracted, or a bare tenant
/// identifier when the tenant was resolved some other way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantContext {
    identity: Option<Identity>,
    tenant: Option<String>,
}

impl TenantContext {
    /// Create empty tenant context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an identity
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            tenant: None,
        }
    }

    /// Create with a bare tenant identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use scopedoc_tenancy::TenantContext;
    ///
    /// let context = TenantContext::with_tenant("acme");
    /// assert_eq!(context.tenant_id(), "acme");
    /// assert!(context.identity().is_none());
    /// ```
    pub fn with_tenant(tenant: impl Into<String>) -> Self {
        Self {
            identity: None,
            tenant: Some(tenant.into()),
        }
    }

    /// Get identity
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Set identity
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Set the tenant, overriding the identity's tenant claim
    pub fn set_tenant(&mut self, tenant: impl Into<String>) {
        self.tenant = Some(tenant.into());
    }

    /// Tenant identifier of the request.
    ///
    /// An explicitly set tenant wins over the identity's claim. Returns `""`
    /// when neither is present, which scopes to the shared namespace.
    pub fn tenant_id(&self) -> &str {
        match (&self.tenant, &self.identity) {
            (Some(tenant), _) => tenant.as_str(),
            (None, Some(identity)) => identity.tenant.as_str(),
            (None, None) => "",
        }
    }

    /// Check if a non-empty tenant is set
    pub fn has_tenant(&self) -> bool {
        !self.tenant_id().is_empty()
    }
}

impl From<Identity> for TenantContext {
    fn from(identity: Identity) -> Self {
        Self::with_identity(identity)
    }
}
