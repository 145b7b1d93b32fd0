//! Request identity
//!
//! Claims carried by a JWT, decoded without verifying the signature.
//! Verification is the job of whatever issued or fronted the token; this
//! module only reads the subject and tenant out of it.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

/// Identity extraction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("identity: incorrect token format")]
    MalformedToken,

    #[error("identity: failed to decode base64 JWT claims: {0}")]
    InvalidEncoding(String),

    #[error("identity: failed to decode JSON JWT claims: {0}")]
    InvalidClaims(String),

    #[error("identity: claim \"sub\" is required")]
    MissingSubject,

    #[error("malformed authorization data")]
    MalformedAuthorization,

    #[error("unknown authorization method {0}")]
    UnsupportedScheme(String),
}

/// Subject and tenant claims of a request.
///
/// Claim names are `sub`, `tenant`, `user`, `device`, `plan` and `trial`.
/// The `mender.`-prefixed spellings are accepted on input and take
/// precedence when a token carries both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Claims")]
pub struct Identity {
    #[serde(rename = "sub")]
    pub subject: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub tenant: String,

    #[serde(rename = "user", skip_serializing_if = "is_false")]
    pub is_user: bool,

    #[serde(rename = "device", skip_serializing_if = "is_false")]
    pub is_device: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub plan: String,

    #[serde(skip_serializing_if = "is_false")]
    pub trial: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Wire form of the claims, with each spelling read separately.
#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    sub: String,
    tenant: Option<String>,
    #[serde(rename = "mender.tenant")]
    mender_tenant: Option<String>,
    user: Option<bool>,
    #[serde(rename = "mender.user")]
    mender_user: Option<bool>,
    device: Option<bool>,
    #[serde(rename = "mender.device")]
    mender_device: Option<bool>,
    plan: Option<String>,
    #[serde(rename = "mender.plan")]
    mender_plan: Option<String>,
    trial: Option<bool>,
    #[serde(rename = "mender.trial")]
    mender_trial: Option<bool>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            tenant: claims.mender_tenant.or(claims.tenant).unwrap_or_default(),
            is_user: claims.mender_user.or(claims.user).unwrap_or_default(),
            is_device: claims.mender_device.or(claims.device).unwrap_or_default(),
            plan: claims.mender_plan.or(claims.plan).unwrap_or_default(),
            trial: claims.mender_trial.or(claims.trial).unwrap_or_default(),
        }
    }
}

impl Identity {
    /// Create an identity for a subject
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Set the tenant
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    /// Set the plan
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = plan.into();
        self
    }

    /// Mark the subject as a user
    pub fn as_user(mut self) -> Self {
        self.is_user = true;
        self
    }

    /// Mark the subject as a device
    pub fn as_device(mut self) -> Self {
        self.is_device = true;
        self
    }

    /// Decode the claims segment of a JWT.
    ///
    /// The signature is not checked. Both URL-safe and standard base64 are
    /// accepted, with or without padding.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopedoc_tenancy::Identity;
    ///
    /// // {"sub":"user-1","tenant":"acme"}
    /// let token = "e30.eyJzdWIiOiJ1c2VyLTEiLCJ0ZW5hbnQiOiJhY21lIn0.sig";
    /// let identity = Identity::from_token(token).unwrap();
    /// assert_eq!(identity.subject, "user-1");
    /// assert_eq!(identity.tenant, "acme");
    /// ```
    pub fn from_token(token: &str) -> Result<Self, IdentityError> {
        let segments: Vec<&str> = token.split('.').collect();
        let [_, claims, _] = segments.as_slice() else {
            return Err(IdentityError::MalformedToken);
        };

        let claims = claims.trim_end_matches('=');
        let raw = URL_SAFE_NO_PAD
            .decode(claims)
            .or_else(|_| STANDARD_NO_PAD.decode(claims))
            .map_err(|e| IdentityError::InvalidEncoding(e.to_string()))?;

        let identity: Identity = serde_json::from_slice(&raw)
            .map_err(|e| IdentityError::InvalidClaims(e.to_string()))?;
        identity.validate()?;
        Ok(identity)
    }

    /// Decode the identity from an `Authorization: Bearer <token>` value.
    pub fn from_authorization(header: &str) -> Result<Self, IdentityError> {
        Self::from_token(bearer_token(header)?)
    }

    /// Check the required claims
    pub fn validate(&self) -> Result<(), IdentityError> {
        if self.subject.is_empty() {
            return Err(IdentityError::MissingSubject);
        }
        Ok(())
    }
}

/// Split the token out of an `Authorization` header value.
pub fn bearer_token(header: &str) -> Result<&str, IdentityError> {
    let parts: Vec<&str> = header.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok(*token),
        [scheme, _] => Err(IdentityError::UnsupportedScheme(scheme.to_string())),
        _ => Err(IdentityError::MalformedAuthorization),
    }
}
