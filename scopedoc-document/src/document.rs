//! Ordered documents
//!
//! A [`Document`] is an ordered sequence of unique keys to values. Order is
//! kept end to end: construction, scoping, serialization and decoding all
//! preserve it.

use crate::error::{DocumentError, Result};
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One key/value pair of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: String,
    pub value: Value,
}

impl Element {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered key/value document with unique keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse JSON bytes into a document, keeping the object's field order.
    ///
    /// Anything other than a JSON object is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopedoc_document::Document;
    ///
    /// let doc = Document::from_slice(br#"{"b": 1, "a": 2}"#).unwrap();
    /// assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    ///
    /// assert!(Document::from_slice(b"[1, 2]").is_err());
    /// ```
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| DocumentError::DecodeFailure(e.to_string()))?;

        match Value::from(parsed) {
            Value::Document(doc) => Ok(doc),
            other => Err(DocumentError::DecodeFailure(format!(
                "expected a document, got {}",
                other.type_name()
            ))),
        }
    }

    /// Insert a pair.
    ///
    /// An existing key keeps its position and has its value replaced; the
    /// old value is returned. New keys are appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.elements[idx].value, value)),
            None => {
                self.elements.push(Element { key, value });
                None
            }
        }
    }

    /// Remove a key, shifting later pairs down to keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.position(key)
            .map(|idx| self.elements.remove(idx).value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.elements
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.key.as_str())
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Serialize to JSON bytes in field order.
    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| DocumentError::EncodeFailure(e.to_string()))
    }
}

impl Extend<Element> for Document {
    fn extend<I: IntoIterator<Item = Element>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element.key, element.value);
        }
    }
}

impl FromIterator<Element> for Document {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut doc = Document::new();
        doc.extend(iter);
        doc
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().map(|(k, v)| Element::new(k, v)).collect()
    }
}

impl IntoIterator for Document {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.elements.len()))?;
        for element in &self.elements {
            map.serialize_entry(&element.key, &element.value)?;
        }
        map.end()
    }
}

/// Build a [`Document`] from `key => value` pairs in order.
///
/// ```
/// use scopedoc_document::{doc, Value};
///
/// let d = doc! { "name" => "acme", "seats" => 10i32 };
/// assert_eq!(d.get("seats"), Some(&Value::Int32(10)));
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::Document::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut d = $crate::Document::new();
        $( d.insert($key, $value); )+
        d
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order() {
        let mut doc = Document::new();
        doc.insert("b", 1i32);
        doc.insert("a", 2i32);
        doc.insert("c", 3i32);

        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_insert_existing_key_replaces_in_place() {
        let mut doc = crate::doc! { "a" => 1i32, "b" => 2i32 };
        let old = doc.insert("a", 10i32);

        assert_eq!(old, Some(Value::Int32(1)));
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(doc.get("a"), Some(&Value::Int32(10)));
    }

    #[test]
    fn test_into_iter_yields_elements_in_order() {
        let doc = crate::doc! { "b" => 1i32, "a" => 2i32 };
        let elements: Vec<Element> = doc.into_iter().collect();

        assert_eq!(
            elements,
            vec![Element::new("b", 1i32), Element::new("a", 2i32)]
        );
    }

    #[test]
    fn test_remove() {
        let mut doc = crate::doc! { "a" => 1i32, "b" => 2i32, "c" => 3i32 };

        assert_eq!(doc.remove("b"), Some(Value::Int32(2)));
        assert_eq!(doc.remove("missing"), None);
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_from_iter_dedups_keys() {
        let doc: Document = vec![("k", "first"), ("x", "y"), ("k", "second")]
            .into_iter()
            .collect();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("k"), Some(&Value::from("second")));
    }

    #[test]
    fn test_serialize_in_order() {
        let doc = crate::doc! { "z" => "last-alpha", "a" => 1i64 };
        let json = String::from_utf8(doc.to_json_vec().unwrap()).unwrap();

        assert_eq!(json, r#"{"z":"last-alpha","a":1}"#);
    }

    #[test]
    fn test_from_slice_errors() {
        assert!(matches!(
            Document::from_slice(b"this is not a document"),
            Err(DocumentError::DecodeFailure(_))
        ));
        assert!(matches!(
            Document::from_slice(b"\"string\""),
            Err(DocumentError::DecodeFailure(_))
        ));
    }

    #[test]
    fn test_from_slice_nested() {
        let doc = Document::from_slice(br#"{"outer": {"y": 1, "x": 2}}"#).unwrap();
        let inner = doc.get("outer").and_then(Value::as_document).unwrap();

        assert_eq!(inner.keys().collect::<Vec<_>>(), vec!["y", "x"]);
    }
}
