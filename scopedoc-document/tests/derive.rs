//! Integration tests for `#[derive(Reflect)]`

use scopedoc_document::{
    DocumentError, DocumentValue, Element, FlattenOptions, Reflect, ToValue, Value, doc,
    document_from_struct, flatten, flatten_struct,
};
use std::collections::HashMap;

#[derive(Reflect)]
struct Nested {
    #[document("nested_val")]
    pub nested_val: String,
}

#[derive(Reflect)]
struct Filter {
    pub string: String,
    pub r#struct: Nested,
}

#[derive(Reflect)]
struct DeviceFilter {
    #[document("device_id")]
    pub id: String,
    #[document("status,omitempty")]
    pub status: String,
    #[document(",omitempty")]
    pub group: Option<String>,
    #[document("-")]
    pub internal: String,
    pub attributes: HashMap<String, String>,
    #[allow(dead_code)]
    cursor: usize,
}

#[derive(Reflect)]
struct Envelope<T> {
    pub kind: String,
    pub payload: T,
}

#[test]
fn test_flatten_nested_struct() {
    let filter = Filter {
        string: "foo".to_string(),
        r#struct: Nested {
            nested_val: "test".to_string(),
        },
    };

    let doc = flatten(&filter, None).unwrap();

    assert_eq!(
        doc,
        doc! {
            "string" => "foo",
            "struct.nested_val" => "test",
        }
    );
    assert!(!doc.contains_key("struct"));
}

#[test]
fn test_reflect_uses_unraw_identifiers() {
    let filter = Filter {
        string: String::new(),
        r#struct: Nested {
            nested_val: String::new(),
        },
    };
    let record = filter.reflect();

    assert_eq!(record.type_name(), "Filter");
    let idents: Vec<_> = record.fields().iter().map(|f| f.ident()).collect();
    assert_eq!(idents, vec!["string", "struct"]);
}

fn device(status: &str) -> DeviceFilter {
    DeviceFilter {
        id: "dev-1".to_string(),
        status: status.to_string(),
        group: None,
        internal: "never emitted".to_string(),
        attributes: HashMap::from([
            ("serial".to_string(), "0xff".to_string()),
            ("mac".to_string(), "00:11".to_string()),
        ]),
        cursor: 7,
    }
}

#[test]
fn test_omitempty_zero_value_is_absent() {
    let doc = flatten_struct(&device(""), None).unwrap();

    assert!(!doc.contains_key("status"));
    assert!(!doc.contains_key("group"));
    assert!(!doc.contains_key("internal"));
    assert!(!doc.contains_key("cursor"));
}

#[test]
fn test_omitempty_non_zero_value_is_present() {
    let mut filter = device("accepted");
    filter.group = Some("staging".to_string());

    let doc = flatten_struct(&filter, None).unwrap();

    assert_eq!(doc.get("status"), Some(&Value::from("accepted")));
    assert_eq!(doc.get("group"), Some(&Value::from("staging")));
}

#[test]
fn test_nested_mapping_keys_sorted() {
    let doc = flatten(&device("accepted"), None).unwrap();

    assert_eq!(
        doc.keys().collect::<Vec<_>>(),
        vec![
            "device_id",
            "status",
            "attributes.mac",
            "attributes.serial"
        ]
    );
}

#[test]
fn test_transform_sees_dotted_keys() {
    let options = FlattenOptions::new().set_transform(|key, value| (key.to_uppercase(), value));

    let doc = flatten(&device(""), Some(&options)).unwrap();

    assert_eq!(
        doc.keys().collect::<Vec<_>>(),
        vec!["DEVICE_ID", "ATTRIBUTES.MAC", "ATTRIBUTES.SERIAL"]
    );
}

#[test]
fn test_generic_struct() {
    let envelope = Envelope {
        kind: "ping".to_string(),
        payload: vec![1i32, 2, 3],
    };

    let doc = flatten(&envelope, None).unwrap();

    assert_eq!(doc.get("kind"), Some(&Value::from("ping")));
    assert_eq!(
        doc.get("payload"),
        Some(&Value::Array(vec![
            Value::Int32(1),
            Value::Int32(2),
            Value::Int32(3)
        ]))
    );
}

#[test]
fn test_generic_struct_nests_derived_payload() {
    let envelope = Envelope {
        kind: "nested".to_string(),
        payload: Nested {
            nested_val: "inner".to_string(),
        },
    };

    let doc = flatten(&envelope, None).unwrap();

    assert_eq!(doc.get("payload.nested_val"), Some(&Value::from("inner")));
}

#[test]
fn test_derived_value_is_structured() {
    let value = device("").to_value();

    assert!(matches!(value, Value::Record(_)));
    assert_eq!(DocumentValue::from(value).kind(), "structured");
}

#[test]
fn test_document_from_struct_keeps_nested_values() {
    let filter = Filter {
        string: "foo".to_string(),
        r#struct: Nested {
            nested_val: "test".to_string(),
        },
    };

    let doc = document_from_struct(
        &filter.to_value(),
        [Element::new("appended", 1i32)],
    )
    .unwrap();

    assert_eq!(
        doc.keys().collect::<Vec<_>>(),
        vec!["string", "struct", "appended"]
    );
    assert!(matches!(doc.get("struct"), Some(Value::Record(_))));
}

#[test]
fn test_flatten_rejects_scalar_input() {
    let err = flatten("not a struct", None).unwrap_err();

    assert_eq!(
        err,
        DocumentError::InvalidArgumentType("string".to_string())
    );
}
