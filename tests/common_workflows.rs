//! Integration tests for common scopedoc workflows.
//!
//! These tests drive the member crates together the way a service does:
//! resolve the tenant, scope or flatten documents, and record the request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use scopedoc::prelude::*;
use std::collections::HashMap;
use std::io::Write;

#[derive(Reflect)]
#[document(crate = "scopedoc::document")]
struct DeviceQuery {
    #[document("status,omitempty")]
    pub status: String,
    pub identity: DeviceIdentity,
    #[document(",omitempty")]
    pub tags: Vec<String>,
}

#[derive(Reflect)]
#[document(crate = "scopedoc::document")]
struct DeviceIdentity {
    #[document("mac")]
    pub mac: String,
    #[document("sn,omitempty")]
    pub serial: String,
}

fn bearer(claims: &str) -> String {
    format!("Bearer h.{}.s", URL_SAFE_NO_PAD.encode(claims))
}

// =============================================================================
// Flatten -> scope
// =============================================================================

#[test]
fn test_flatten_then_scope_query() {
    let query = DeviceQuery {
        status: "accepted".to_string(),
        identity: DeviceIdentity {
            mac: "00:11:22".to_string(),
            serial: String::new(),
        },
        tags: vec!["a".to_string(), "b".to_string()],
    };

    let options = FlattenOptions::new().set_transform(|key, value| match value {
        Value::Array(items) => (key, Value::from(doc! { "$in" => Value::Array(items) })),
        other => (key, other),
    });
    let flat = flatten(&query, Some(&options)).unwrap();

    assert_eq!(
        flat.keys().collect::<Vec<_>>(),
        vec!["status", "identity.mac", "tags"]
    );
    assert!(!flat.contains_key("identity"));
    assert!(!flat.contains_key("identity.sn"));

    let scoped = TenantScoper::default().scope("acme", flat);
    assert_eq!(
        scoped.keys().collect::<Vec<_>>(),
        vec!["status", "identity.mac", "tags", "tenant_id"]
    );
    let tags = scoped.get("tags").and_then(Value::as_document).unwrap();
    assert_eq!(tags.keys().collect::<Vec<_>>(), vec!["$in"]);
}

#[test]
fn test_scoped_document_serializes_in_order() {
    let scoped = TenantScoper::default().scope("t1", doc! { "b" => 1i32, "a" => 2i32 });
    let json = String::from_utf8(scoped.to_json_vec().unwrap()).unwrap();

    assert_eq!(json, r#"{"b":1,"a":2,"tenant_id":"t1"}"#);
}

// =============================================================================
// Request -> tenant -> naming
// =============================================================================

#[test]
fn test_jwt_request_scopes_and_names() {
    let headers: Headers = HashMap::from([(
        "Authorization".to_string(),
        bearer(r#"{"sub":"user-1","mender.tenant":"acme"}"#),
    )]);

    let context = JwtTenantResolver::default().resolve(&headers).unwrap();
    let scoped = TenantScoper::default().scope_with_context(&context, doc! { "k" => "v" });

    assert_eq!(scoped.get("tenant_id"), Some(&Value::from("acme")));

    let db = name_from_context(&context, "deviceauth");
    assert_eq!(db, "deviceauth-acme");
    assert!(is_tenant_scoped_name("deviceauth")(&db));
    assert_eq!(tenant_from_name(&db, "deviceauth"), "acme");
}

#[test]
fn test_request_without_tenant_uses_shared_namespace() {
    let headers: Headers =
        HashMap::from([("authorization".to_string(), bearer(r#"{"sub":"device-9"}"#))]);

    let context = JwtTenantResolver::default().resolve(&headers).unwrap();
    let scoped = TenantScoper::default().scope_array_with_context(
        &context,
        vec![doc! { "n" => 1i32 }, doc! { "n" => 2i32 }],
    );

    assert_eq!(
        scoped,
        vec![
            doc! { "n" => 1i32, "tenant_id" => "" },
            doc! { "n" => 2i32, "tenant_id" => "" },
        ]
    );
    assert_eq!(name_from_context(&context, "deviceauth"), "deviceauth");
}

// =============================================================================
// Configuration -> scoper + access log
// =============================================================================

#[test]
fn test_config_file_drives_scoper() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "tenant_field = \"org_id\"\nmax_errors = 2").unwrap();

    let manager = ConfigManager::new();
    manager.load_file_auto(file.path()).unwrap();
    let scopedoc = Scopedoc::from_manager(&manager).unwrap();

    let scoped = scopedoc.scoper().scope("acme", doc! { "k" => "v" });
    assert_eq!(scoped, doc! { "k" => "v", "org_id" => "acme" });

    let access = scopedoc.access_log();
    assert!(access.push_error("first"));
    assert!(access.push_error("second"));
    assert!(!access.push_error("third"));

    let mut fields = serde_json::Map::new();
    access.set_field("tenant", "acme");
    access.add_fields(&mut fields);
    assert_eq!(fields["error"], serde_json::json!("first; second"));
    assert_eq!(fields["tenant"], serde_json::json!("acme"));
}

#[test]
fn test_invalid_tenant_field_rejected() {
    let manager = ConfigManager::new();
    manager.set("tenant_field", "$bad").unwrap();

    assert!(Scopedoc::from_manager(&manager).is_err());
    assert!(Scopedoc::new(ScopeConfig::new("a.b")).is_err());
}

#[test]
fn test_default_scopedoc() {
    let scopedoc = Scopedoc::default();

    assert_eq!(scopedoc.scoper().field(), "tenant_id");
    assert_eq!(scopedoc.access_log().max_errors(), 5);
}
