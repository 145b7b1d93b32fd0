//! Tenant Resolution
//!
//! Strategies for resolving the tenant of a request from its headers.

use crate::identity::{Identity, IdentityError, bearer_token};
use crate::tenant::TenantContext;
use std::collections::HashMap;

/// Request headers, keyed by header name.
pub type Headers = HashMap<String, String>;

/// Default header carrying a bare tenant identifier.
pub const DEFAULT_TENANT_HEADER: &str = "X-Tenant-ID";

/// Default cookie consulted when no `Authorization` header is present.
pub const DEFAULT_JWT_COOKIE: &str = "JWT";

/// Tenant resolution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TenantError {
    #[error("Tenant not found: {0}")]
    NotFound(String),

    #[error("Invalid tenant identifier: {0}")]
    Invalid(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Tenant resolver trait
///
/// Implement this trait to plug another resolution strategy in front of
/// the scoper.
pub trait TenantResolver: Send + Sync {
    /// Resolve the tenant context from request headers
    fn resolve(&self, headers: &Headers) -> Result<TenantContext, TenantError>;
}

/// Case-insensitive header lookup.
pub fn header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Header-based tenant resolver
///
/// Resolves tenant from a request header (e.g., `X-Tenant-ID`).
#[derive(Debug, Clone)]
pub struct HeaderTenantResolver {
    header_name: String,
}

impl HeaderTenantResolver {
    /// Create new header-based resolver
    ///
    /// # Examples
    ///
    /// ```
    /// use scopedoc_tenancy::{Headers, HeaderTenantResolver, TenantResolver};
    ///
    /// let resolver = HeaderTenantResolver::new("X-Tenant-ID");
    /// let headers = Headers::from([("x-tenant-id".to_string(), "acme".to_string())]);
    ///
    /// let context = resolver.resolve(&headers).unwrap();
    /// assert_eq!(context.tenant_id(), "acme");
    /// ```
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
        }
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }
}

impl Default for HeaderTenantResolver {
    fn default() -> Self {
        Self::new(DEFAULT_TENANT_HEADER)
    }
}

impl TenantResolver for HeaderTenantResolver {
    fn resolve(&self, headers: &Headers) -> Result<TenantContext, TenantError> {
        let tenant_id = header(headers, &self.header_name)
            .ok_or_else(|| TenantError::NotFound(format!("Missing header: {}", self.header_name)))?
            .trim();

        if tenant_id.is_empty() {
            return Err(TenantError::Invalid(format!(
                "Empty header: {}",
                self.header_name
            )));
        }

        Ok(TenantContext::with_tenant(tenant_id))
    }
}

/// JWT claim-based tenant resolver
///
/// Reads the identity from `Authorization: Bearer <token>`, falling back to
/// a cookie holding the raw token. The token signature is not verified.
#[derive(Debug, Clone)]
pub struct JwtTenantResolver {
    cookie_name: String,
}

impl JwtTenantResolver {
    /// Create new JWT-based resolver with the fallback cookie name
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    /// Raw token of the request
    pub fn token<'a>(&self, headers: &'a Headers) -> Result<&'a str, TenantError> {
        if let Some(authorization) = header(headers, "authorization") {
            return Ok(bearer_token(authorization)?);
        }

        header(headers, "cookie")
            .and_then(|cookies| self.cookie(cookies))
            .ok_or_else(|| TenantError::NotFound("Missing Authorization header".to_string()))
    }

    fn cookie<'a>(&self, cookies: &'a str) -> Option<&'a str> {
        cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty())
    }
}

impl Default for JwtTenantResolver {
    fn default() -> Self {
        Self::new(DEFAULT_JWT_COOKIE)
    }
}

impl TenantResolver for JwtTenantResolver {
    fn resolve(&self, headers: &Headers) -> Result<TenantContext, TenantError> {
        let identity = Identity::from_token(self.token(headers)?)?;
        Ok(TenantContext::with_identity(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn token(claims: &str) -> String {
        format!("foo.{}.bar", URL_SAFE_NO_PAD.encode(claims))
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let h = headers(&[("X-Tenant-Id", "t1")]);
        assert_eq!(header(&h, "x-tenant-id"), Some("t1"));
        assert_eq!(header(&h, "host"), None);
    }

    #[test]
    fn test_header_resolver() {
        let resolver = HeaderTenantResolver::default();

        let context = resolver
            .resolve(&headers(&[("x-tenant-id", "tenant-1")]))
            .unwrap();
        assert_eq!(context.tenant_id(), "tenant-1");
    }

    #[test]
    fn test_header_resolver_missing_or_empty() {
        let resolver = HeaderTenantResolver::new("X-Org");

        assert_eq!(
            resolver.resolve(&Headers::new()),
            Err(TenantError::NotFound("Missing header: X-Org".to_string()))
        );
        assert!(matches!(
            resolver.resolve(&headers(&[("x-org", "  ")])),
            Err(TenantError::Invalid(_))
        ));
    }

    #[test]
    fn test_jwt_resolver_bearer() {
        let resolver = JwtTenantResolver::default();
        let bearer = format!("Bearer {}", token(r#"{"sub":"u1","tenant":"acme"}"#));

        let context = resolver
            .resolve(&headers(&[("Authorization", &bearer)]))
            .unwrap();
        assert_eq!(context.tenant_id(), "acme");
        assert_eq!(context.identity().map(|i| i.subject.as_str()), Some("u1"));
    }

    #[test]
    fn test_jwt_resolver_cookie_fallback() {
        let resolver = JwtTenantResolver::default();
        let raw = token(r#"{"sub":"u1"}"#);
        let cookie = format!("theme=dark; JWT={raw}");
        let h = headers(&[("Cookie", &cookie)]);

        assert_eq!(resolver.token(&h).unwrap(), raw);
        assert_eq!(resolver.resolve(&h).unwrap().tenant_id(), "");
    }

    #[test]
    fn test_jwt_resolver_errors() {
        let resolver = JwtTenantResolver::default();

        assert!(matches!(
            resolver.resolve(&Headers::new()),
            Err(TenantError::NotFound(_))
        ));
        assert_eq!(
            resolver.resolve(&headers(&[("authorization", "Basic foobar")])),
            Err(TenantError::Identity(IdentityError::UnsupportedScheme(
                "Basic".to_string()
            )))
        );
        assert_eq!(
            resolver.resolve(&headers(&[("authorization", "Bearer")])),
            Err(TenantError::Identity(IdentityError::MalformedAuthorization))
        );
    }
}
