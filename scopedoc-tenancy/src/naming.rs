//! Tenant-scoped naming
//!
//! Derives the name of a per-tenant storage container from a base name and
//! recovers the tenant from such a name. Matching is done on the literal
//! `base-` prefix, so both parts may contain `-` themselves.

use crate::tenant::TenantContext;

/// Separator between the base name and the tenant identifier.
pub const NAME_SEPARATOR: char = '-';

/// Name of the container holding `tenant_id`'s data.
///
/// An empty tenant keeps the base name.
///
/// # Examples
///
/// ```
/// use scopedoc_tenancy::name_for_tenant;
///
/// assert_eq!(name_for_tenant("tenant1", "deviceauth"), "deviceauth-tenant1");
/// assert_eq!(name_for_tenant("", "deviceauth"), "deviceauth");
/// ```
pub fn name_for_tenant(tenant_id: &str, base: &str) -> String {
    if tenant_id.is_empty() {
        return base.to_string();
    }
    format!("{}{}{}", base, NAME_SEPARATOR, tenant_id)
}

/// Container name for the tenant held by a request context.
pub fn name_from_context(context: &TenantContext, base: &str) -> String {
    name_for_tenant(context.tenant_id(), base)
}

/// Predicate matching names derived from `base` for some tenant.
///
/// ```
/// use scopedoc_tenancy::is_tenant_scoped_name;
///
/// let matches = is_tenant_scoped_name("servicedb");
/// assert!(matches("servicedb-tenant1"));
/// assert!(!matches("servicedb"));
/// assert!(!matches("servicedbtenant1"));
/// ```
pub fn is_tenant_scoped_name(base: &str) -> impl Fn(&str) -> bool + use<> {
    let prefix = format!("{}{}", base, NAME_SEPARATOR);
    move |candidate: &str| candidate.len() > prefix.len() && candidate.starts_with(&prefix)
}

/// The tenant part of `candidate`, or `""` when it was not derived from
/// `base`.
pub fn tenant_from_name<'a>(candidate: &'a str, base: &str) -> &'a str {
    candidate
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix(NAME_SEPARATOR))
        .unwrap_or("")
}
