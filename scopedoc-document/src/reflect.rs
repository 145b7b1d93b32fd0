//! Struct reflection
//!
//! A [`Record`] is a struct seen from the outside: its type name and an
//! ordered list of fields, each with the identifier, optional tag and value.
//! `#[derive(Reflect)]` produces records for named-field structs; records
//! can also be assembled by hand from a static field list.
//!
//! Tags use the `name[,omitempty]` syntax:
//!
//! ```
//! use scopedoc_document::FieldDescriptor;
//!
//! let d = FieldDescriptor::resolve("Updated", Some("updated_ts,omitempty"));
//! assert_eq!(d.name, "updated_ts");
//! assert!(d.omit_empty);
//!
//! let d = FieldDescriptor::resolve("NestedVal", None);
//! assert_eq!(d.name, "nestedval");
//! ```

use crate::document::Document;
use crate::value::Value;

/// Types that can describe their fields at runtime.
pub trait Reflect {
    fn reflect(&self) -> Record;
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect(&self) -> Record {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn reflect(&self) -> Record {
        (**self).reflect()
    }
}

/// Naming and omission rules resolved for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Key the field is emitted under
    pub name: String,
    /// Skip the field when its value is empty
    pub omit_empty: bool,
    /// Never emit the field (non-public field or `-` tag)
    pub skip: bool,
    /// The value is a struct or mapping the flattener descends into
    pub nested: bool,
}

impl FieldDescriptor {
    /// Resolve the descriptor of a field from its identifier and tag.
    ///
    /// A non-empty tag name wins; otherwise the lower-cased identifier is
    /// used. The tag `-` marks the field as skipped. Unknown options are
    /// ignored.
    pub fn resolve(ident: &str, tag: Option<&str>) -> Self {
        let mut descriptor = Self {
            name: ident.to_lowercase(),
            omit_empty: false,
            skip: false,
            nested: false,
        };

        let Some(tag) = tag else {
            return descriptor;
        };
        if tag == "-" {
            descriptor.skip = true;
            return descriptor;
        }

        let mut parts = tag.split(',');
        if let Some(name) = parts.next().map(str::trim).filter(|n| !n.is_empty()) {
            descriptor.name = name.to_string();
        }
        for option in parts {
            if option.trim() == "omitempty" {
                descriptor.omit_empty = true;
            }
        }

        descriptor
    }

    /// Whether a field with this descriptor and value is emitted.
    pub fn emits(&self, value: &Value) -> bool {
        !self.skip && !(self.omit_empty && value.is_zero())
    }
}

/// One reflected struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    ident: &'static str,
    tag: Option<&'static str>,
    exported: bool,
    value: Value,
}

impl Field {
    /// A public field without a tag
    pub fn new(ident: &'static str, value: impl Into<Value>) -> Self {
        Self {
            ident,
            tag: None,
            exported: true,
            value: value.into(),
        }
    }

    /// Attach a `name[,omitempty]` tag
    pub fn tagged(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Mark the field as non-public; it is never emitted
    pub fn unexported(mut self) -> Self {
        self.exported = false;
        self
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn tag(&self) -> Option<&'static str> {
        self.tag
    }

    pub fn is_exported(&self) -> bool {
        self.exported
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn descriptor(&self) -> FieldDescriptor {
        let mut descriptor = FieldDescriptor::resolve(self.ident, self.tag);
        descriptor.skip |= !self.exported;
        descriptor.nested = self.value.is_nested();
        descriptor
    }
}

/// A reflected struct: type name plus fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: &'static str,
    fields: Vec<Field>,
}

impl Record {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// A record is empty when every field holds an empty value.
    pub fn is_zero(&self) -> bool {
        self.fields.iter().all(|f| f.value.is_zero())
    }

    /// Fields that survive the naming and omission rules, in order.
    pub fn visible_fields(&self) -> impl Iterator<Item = (FieldDescriptor, &Value)> {
        self.fields
            .iter()
            .map(|f| (f.descriptor(), &f.value))
            .filter(|(descriptor, value)| descriptor.emits(value))
    }

    /// Top-level conversion: one pair per visible field, values carried
    /// through as they are.
    pub fn to_document(&self) -> Document {
        self.visible_fields()
            .map(|(descriptor, value)| (descriptor.name, value.clone()))
            .collect()
    }
}
