//! Scopedoc Documents
//!
//! Canonical, ordered document representation for schema-less stores.
//!
//! - [`Value`] / [`Document`] - the closed value model and ordered documents
//! - [`Reflect`] / [`Record`] - struct reflection, with `#[derive(Reflect)]`
//! - [`flatten`] - collapse structs and mappings into dotted-path documents
//! - [`DocumentValue`] - every shape a document may arrive in
//!
//! # Quick Start
//!
//! ```rust
//! use scopedoc_document::{flatten, Reflect, Value};
//!
//! #[derive(Reflect)]
//! struct Nested {
//!     #[document("nested_val")]
//!     pub nested_val: String,
//! }
//!
//! #[derive(Reflect)]
//! struct Filter {
//!     #[document(",omitempty")]
//!     pub name: String,
//!     pub nested: Nested,
//! }
//!
//! let filter = Filter {
//!     name: "foo".to_string(),
//!     nested: Nested { nested_val: "test".to_string() },
//! };
//!
//! let doc = flatten(&filter, None).unwrap();
//! assert_eq!(doc.get("name"), Some(&Value::from("foo")));
//! assert_eq!(doc.get("nested.nested_val"), Some(&Value::from("test")));
//! ```

pub mod document;
pub mod document_value;
pub mod error;
pub mod flatten;
pub mod reflect;
pub mod value;

pub use document::{Document, Element};
pub use document_value::{BoxError, DocumentValue, EncodeDocument, decode_custom};
pub use error::{DocumentError, Result};
pub use flatten::{
    FlattenOptions, PATH_SEPARATOR, document_from_struct, flatten, flatten_struct, flatten_value,
};
pub use reflect::{Field, FieldDescriptor, Record, Reflect};
pub use value::{ToValue, Value};

/// Derive [`Reflect`] and [`ToValue`] for a named-field struct.
pub use scopedoc_macro::Reflect;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Document, DocumentError, DocumentValue, Element, EncodeDocument, Field, FlattenOptions,
        Record, Reflect, ToValue, Value, doc, flatten,
    };
}
