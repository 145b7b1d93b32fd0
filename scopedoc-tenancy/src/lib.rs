//! Multi-Tenancy for scopedoc
//!
//! Scopes documents to a tenant before they reach the store, and derives
//! per-tenant container names.
//!
//! # Features
//!
//! - **Tenant Scoping** - discriminator injection for every document shape
//! - **Tenant-Scoped Naming** - `base-tenant` container names and their inverse
//! - **Tenant Resolution** - tenant context from headers or JWT claims
//!
//! # Quick Start
//!
//! ```rust
//! use scopedoc_document::{doc, Value};
//! use scopedoc_tenancy::prelude::*;
//!
//! let resolver = HeaderTenantResolver::default();
//! let headers = Headers::from([("X-Tenant-ID".to_string(), "acme".to_string())]);
//! let context = resolver.resolve(&headers).unwrap();
//!
//! let scoper = TenantScoper::default();
//! let query = scoper.scope_with_context(&context, doc! { "status" => "accepted" });
//! assert_eq!(query.get("tenant_id"), Some(&Value::from("acme")));
//!
//! assert_eq!(name_from_context(&context, "deviceauth"), "deviceauth-acme");
//! ```

pub mod identity;
pub mod naming;
pub mod resolver;
pub mod scoper;
pub mod tenant;

pub use identity::{Identity, IdentityError, bearer_token};
pub use naming::{
    NAME_SEPARATOR, is_tenant_scoped_name, name_for_tenant, name_from_context, tenant_from_name,
};
pub use resolver::{
    DEFAULT_JWT_COOKIE, DEFAULT_TENANT_HEADER, HeaderTenantResolver, Headers, JwtTenantResolver,
    TenantError, TenantResolver, header,
};
pub use scoper::{FIELD_TENANT_ID, TenantScoper};
pub use tenant::TenantContext;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::identity::{Identity, IdentityError};
    pub use crate::naming::{
        is_tenant_scoped_name, name_for_tenant, name_from_context, tenant_from_name,
    };
    pub use crate::resolver::{
        HeaderTenantResolver, Headers, JwtTenantResolver, TenantError, TenantResolver,
    };
    pub use crate::scoper::TenantScoper;
    pub use crate::tenant::TenantContext;
}
