//! Flattening
//!
//! Collapses structs and mappings into a single-level [`Document`] whose
//! keys are dot-joined paths, e.g. `struct.nested_val`. Typical use is
//! turning a typed filter into a query document.
//!
//! ```
//! use scopedoc_document::{flatten, Field, Record, Value};
//!
//! let filter = Record::new("Filter")
//!     .with_field(Field::new("Name", "acme"))
//!     .with_field(Field::new(
//!         "Owner",
//!         Record::new("Owner").with_field(Field::new("Email", "a@acme.io")),
//!     ));
//!
//! let doc = flatten(&filter, None).unwrap();
//! assert_eq!(doc.get("owner.email"), Some(&Value::from("a@acme.io")));
//! assert!(doc.get("owner").is_none());
//! ```

use crate::document::{Document, Element};
use crate::error::{DocumentError, Result};
use crate::reflect::Reflect;
use crate::value::{ToValue, Value};
use scopedoc_log::debug;
use std::fmt;

/// Path separator between a parent key and its children.
pub const PATH_SEPARATOR: char = '.';

type TransformFn = dyn Fn(String, Value) -> (String, Value) + Send + Sync;

/// Options for [`flatten`].
#[derive(Default)]
pub struct FlattenOptions {
    transform: Option<Box<TransformFn>>,
}

impl FlattenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite every leaf pair before it is emitted.
    ///
    /// The hook receives the full dotted key. It never sees the parent keys
    /// of nested values, only their leaves.
    pub fn set_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(String, Value) -> (String, Value) + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    fn apply(&self, key: String, value: Value) -> (String, Value) {
        match &self.transform {
            Some(transform) => transform(key, value),
            None => (key, value),
        }
    }
}

impl fmt::Debug for FlattenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlattenOptions")
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Flatten a struct or string-keyed mapping.
///
/// Struct fields keep declaration order and follow the tag rules of
/// [`FieldDescriptor`](crate::FieldDescriptor); mapping keys are emitted in
/// lexicographic order. Nested structs and mappings are descended into and
/// only their leaves appear, prefixed with `parent.`.
///
/// # Errors
///
/// - [`DocumentError::InvalidArgumentType`] when `value` is neither a struct
///   nor a mapping.
/// - [`DocumentError::UninspectableValue`] when an untyped value is found.
/// - [`DocumentError::DuplicateKey`] when two leaves, after any transform,
///   share a dotted key.
pub fn flatten<T: ToValue + ?Sized>(
    value: &T,
    options: Option<&FlattenOptions>,
) -> Result<Document> {
    flatten_value(&value.to_value(), options)
}

/// [`flatten`] for a struct that implements [`Reflect`].
pub fn flatten_struct<T: Reflect + ?Sized>(
    value: &T,
    options: Option<&FlattenOptions>,
) -> Result<Document> {
    flatten_value(&Value::Record(value.reflect()), options)
}

/// [`flatten`] over an already converted [`Value`].
pub fn flatten_value(value: &Value, options: Option<&FlattenOptions>) -> Result<Document> {
    if !value.is_nested() {
        debug!(
            target: "scopedoc::flatten",
            "Rejecting flatten input of type {}",
            value.type_name()
        );
        return Err(DocumentError::InvalidArgumentType(
            value.type_name().to_string(),
        ));
    }

    let default_options = FlattenOptions::default();
    let mut flattener = Flattener {
        options: options.unwrap_or(&default_options),
        out: Document::new(),
    };
    flattener.descend(None, value)?;
    Ok(flattener.out)
}

struct Flattener<'a> {
    options: &'a FlattenOptions,
    out: Document,
}

impl Flattener<'_> {
    fn descend(&mut self, prefix: Option<&str>, value: &Value) -> Result<()> {
        match value {
            Value::Record(record) => {
                for (descriptor, child) in record.visible_fields() {
                    self.emit(join(prefix, &descriptor.name), child)?;
                }
            }
            Value::Map(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                for key in keys {
                    self.emit(join(prefix, key), &map[key])?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn emit(&mut self, key: String, value: &Value) -> Result<()> {
        match value {
            Value::Undefined => Err(DocumentError::UninspectableValue(key)),
            nested if nested.is_nested() => self.descend(Some(&key), nested),
            leaf => {
                let (key, value) = self.options.apply(key, leaf.clone());
                if self.out.contains_key(&key) {
                    return Err(DocumentError::DuplicateKey(key));
                }
                self.out.insert(key, value);
                Ok(())
            }
        }
    }
}

fn join(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}{}{}", prefix, PATH_SEPARATOR, key),
        None => key.to_string(),
    }
}

/// Convert a struct into a document of its top-level fields, followed by
/// `append`.
///
/// Unlike [`flatten`], nested values are carried through untouched. Returns
/// `None` when `value` is not a struct.
///
/// ```
/// use scopedoc_document::{document_from_struct, Element, Field, Record, Value};
///
/// let record = Record::new("Sample").with_field(Field::new("Field1", "baz").tagged("foo"));
/// let doc = document_from_struct(&Value::Record(record), [Element::new("a1", 123i32)]).unwrap();
/// assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["foo", "a1"]);
///
/// assert!(document_from_struct(&Value::from("not a struct"), []).is_none());
/// ```
pub fn document_from_struct(
    value: &Value,
    append: impl IntoIterator<Item = Element>,
) -> Option<Document> {
    match value {
        Value::Record(record) => {
            let mut doc = record.to_document();
            doc.extend(append);
            Some(doc)
        }
        _ => None,
    }
}
