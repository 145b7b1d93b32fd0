//! Document-shaped inputs
//!
//! [`DocumentValue`] names every representation a document may arrive in.
//! Consumers switch over it once instead of probing concrete types.

use crate::document::Document;
use crate::error::{DocumentError, Result};
use crate::reflect::{Reflect, Record};
use crate::value::{ToValue, Value};
use std::collections::HashMap;
use std::fmt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A value that knows how to encode itself as a document.
///
/// The bytes must be a JSON object; anything else is rejected when the
/// output is decoded.
pub trait EncodeDocument {
    fn encode_document(&self) -> std::result::Result<Vec<u8>, BoxError>;
}

/// Every representation a document can arrive in.
pub enum DocumentValue {
    /// Already ordered key/value pairs
    OrderedPairs(Document),
    /// String-keyed mapping without a defined order
    UnorderedMapping(HashMap<String, Value>),
    /// A reflected struct
    Structured(Record),
    /// An opaque value with its own encoder
    CustomEncoded(Box<dyn EncodeDocument + Send + Sync>),
    /// Anything else; cannot be treated as a document
    Unrecognized(Value),
}

impl DocumentValue {
    /// Wrap a value that encodes itself.
    pub fn custom(value: impl EncodeDocument + Send + Sync + 'static) -> Self {
        DocumentValue::CustomEncoded(Box::new(value))
    }

    /// Reflect a struct.
    pub fn structured<T: Reflect + ?Sized>(value: &T) -> Self {
        DocumentValue::Structured(value.reflect())
    }

    /// Convert any [`ToValue`] type and classify the result.
    pub fn of<T: ToValue + ?Sized>(value: &T) -> Self {
        DocumentValue::from(value.to_value())
    }

    /// Short name of the representation, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentValue::OrderedPairs(_) => "ordered-pairs",
            DocumentValue::UnorderedMapping(_) => "unordered-mapping",
            DocumentValue::Structured(_) => "structured",
            DocumentValue::CustomEncoded(_) => "custom-encoded",
            DocumentValue::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Run a custom encoder and decode its output back into a document.
///
/// # Errors
///
/// [`DocumentError::EncodeFailure`] when the encoder fails and
/// [`DocumentError::DecodeFailure`] when the bytes are not a document.
pub fn decode_custom(encoder: &(dyn EncodeDocument + Send + Sync)) -> Result<Document> {
    let bytes = encoder
        .encode_document()
        .map_err(|e| DocumentError::EncodeFailure(e.to_string()))?;
    Document::from_slice(&bytes)
}

impl From<Value> for DocumentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Document(doc) => DocumentValue::OrderedPairs(doc),
            Value::Map(map) => DocumentValue::UnorderedMapping(map),
            Value::Record(record) => DocumentValue::Structured(record),
            other => DocumentValue::Unrecognized(other),
        }
    }
}

impl From<Document> for DocumentValue {
    fn from(doc: Document) -> Self {
        DocumentValue::OrderedPairs(doc)
    }
}

impl From<HashMap<String, Value>> for DocumentValue {
    fn from(map: HashMap<String, Value>) -> Self {
        DocumentValue::UnorderedMapping(map)
    }
}

impl From<Record> for DocumentValue {
    fn from(record: Record) -> Self {
        DocumentValue::Structured(record)
    }
}

impl From<&str> for DocumentValue {
    fn from(s: &str) -> Self {
        DocumentValue::Unrecognized(Value::from(s))
    }
}

impl fmt::Debug for DocumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentValue::OrderedPairs(doc) => f.debug_tuple("OrderedPairs").field(doc).finish(),
            DocumentValue::UnorderedMapping(map) => {
                f.debug_tuple("UnorderedMapping").field(map).finish()
            }
            DocumentValue::Structured(record) => {
                f.debug_tuple("Structured").field(record).finish()
            }
            DocumentValue::CustomEncoded(_) => f.write_str("CustomEncoded(..)"),
            DocumentValue::Unrecognized(value) => {
                f.debug_tuple("Unrecognized").field(value).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::Field;

    struct JsonEncoder(&'static [u8]);

    impl EncodeDocument for JsonEncoder {
        fn encode_document(&self) -> std::result::Result<Vec<u8>, BoxError> {
            Ok(self.0.to_vec())
        }
    }

    struct FailingEncoder;

    impl EncodeDocument for FailingEncoder {
        fn encode_document(&self) -> std::result::Result<Vec<u8>, BoxError> {
            Err("dunno".into())
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(DocumentValue::of(&crate::doc! { "k" => "v" }).kind(), "ordered-pairs");
        assert_eq!(
            DocumentValue::of(&HashMap::from([("k".to_string(), 1i32)])).kind(),
            "unordered-mapping"
        );
        assert_eq!(
            DocumentValue::from(Record::new("S").with_field(Field::new("A", 1i32))).kind(),
            "structured"
        );
        assert_eq!(DocumentValue::of(&42i32).kind(), "unrecognized");
        assert_eq!(DocumentValue::from("dummy-value").kind(), "unrecognized");
        assert_eq!(DocumentValue::custom(FailingEncoder).kind(), "custom-encoded");
    }

    #[test]
    fn test_decode_custom_ok() {
        let doc = decode_custom(&JsonEncoder(br#"{"attribute": "val"}"#)).unwrap();
        assert_eq!(doc, crate::doc! { "attribute" => "val" });
    }

    #[test]
    fn test_decode_custom_encode_failure() {
        let err = decode_custom(&FailingEncoder).unwrap_err();
        assert_eq!(err, DocumentError::EncodeFailure("dunno".to_string()));
    }

    #[test]
    fn test_decode_custom_invalid_output() {
        let err = decode_custom(&JsonEncoder(b"this is an invalid document")).unwrap_err();
        assert!(matches!(err, DocumentError::DecodeFailure(_)));
    }

    #[test]
    fn test_debug_custom() {
        let rendered = format!("{:?}", DocumentValue::custom(FailingEncoder));
        assert_eq!(rendered, "CustomEncoded(..)");
    }
}
