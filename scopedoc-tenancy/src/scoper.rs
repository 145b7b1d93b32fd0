//! Tenant scoping
//!
//! Adds the tenant discriminator to a document whatever shape it arrives
//! in. The result is always an ordered [`Document`]: the input's pairs in
//! their original order, followed by the discriminator.
//!
//! Inputs that cannot hold a tenant (scalars, custom encoders that fail or
//! produce something other than a document) yield an empty document. The
//! scoper never returns an error.

use crate::tenant::TenantContext;
use scopedoc_config::{DEFAULT_TENANT_FIELD, ScopeConfig};
use scopedoc_document::{Document, DocumentValue, Element, Value, decode_custom, document_from_struct};
use scopedoc_log::debug;

/// Name of the discriminator field when none is configured.
pub const FIELD_TENANT_ID: &str = DEFAULT_TENANT_FIELD;

/// Injects a tenant discriminator into documents.
///
/// # Examples
///
/// ```
/// use scopedoc_document::{doc, Value};
/// use scopedoc_tenancy::TenantScoper;
///
/// let scoper = TenantScoper::default();
/// let scoped = scoper.scope("acme", doc! { "name" => "sensor-1" });
///
/// assert_eq!(scoped.keys().collect::<Vec<_>>(), vec!["name", "tenant_id"]);
/// assert_eq!(scoped.get("tenant_id"), Some(&Value::from("acme")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScoper {
    field: String,
}

impl TenantScoper {
    /// Create a scoper writing the tenant under `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Create a scoper from configuration
    pub fn from_config(config: &ScopeConfig) -> Self {
        Self::new(config.tenant_field.clone())
    }

    /// Name of the discriminator field
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Scope a document to `tenant_id`.
    ///
    /// An empty tenant is still written, as `""`. A discriminator already
    /// present in the input is dropped and the new one appended.
    pub fn scope(&self, tenant_id: &str, value: impl Into<DocumentValue>) -> Document {
        let value = value.into();
        let kind = value.kind();

        let Some(mut doc) = into_document(value) else {
            debug!(
                target: "scopedoc::tenancy",
                "Scoping {} input to tenant {:?} produced an empty document",
                kind,
                tenant_id
            );
            return Document::new();
        };

        doc.remove(&self.field);
        doc.insert(self.field.clone(), tenant_id);
        doc
    }

    /// Scope every element of a sequence, keeping order and length.
    pub fn scope_array<I>(&self, tenant_id: &str, values: I) -> Vec<Document>
    where
        I: IntoIterator,
        I::Item: Into<DocumentValue>,
    {
        values
            .into_iter()
            .map(|value| self.scope(tenant_id, value))
            .collect()
    }

    /// Scope a document to the tenant of a request context.
    pub fn scope_with_context(
        &self,
        context: &TenantContext,
        value: impl Into<DocumentValue>,
    ) -> Document {
        self.scope(context.tenant_id(), value)
    }

    /// Scope every element of a sequence to the tenant of a request context.
    pub fn scope_array_with_context<I>(&self, context: &TenantContext, values: I) -> Vec<Document>
    where
        I: IntoIterator,
        I::Item: Into<DocumentValue>,
    {
        self.scope_array(context.tenant_id(), values)
    }
}

impl Default for TenantScoper {
    fn default() -> Self {
        Self::new(FIELD_TENANT_ID)
    }
}

/// The input as an ordered document, or `None` when it cannot be one.
fn into_document(value: DocumentValue) -> Option<Document> {
    match value {
        DocumentValue::OrderedPairs(doc) => Some(doc),
        DocumentValue::UnorderedMapping(map) => {
            let mut pairs: Vec<(String, Value)> = map.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            Some(pairs.into_iter().collect())
        }
        DocumentValue::Structured(record) => {
            document_from_struct(&Value::Record(record), Vec::<Element>::new())
        }
        DocumentValue::CustomEncoded(encoder) => match decode_custom(&*encoder) {
            Ok(doc) => Some(doc),
            Err(e) => {
                debug!(target: "scopedoc::tenancy", "Custom document encoding failed: {}", e);
                None
            }
        },
        DocumentValue::Unrecognized(_) => None,
    }
}
