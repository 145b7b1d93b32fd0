//! Request Access-Log Context
//!
//! A request-scoped sink that handlers push errors and extra fields into.
//! The access-logging layer reads it once the request completes and merges
//! everything into a single structured entry.
//!
//! # Usage
//!
//! ```rust
//! use scopedoc_log::AccessLogContext;
//! use std::sync::Arc;
//!
//! let ctx = Arc::new(AccessLogContext::default());
//! ctx.push_error("tenant lookup failed");
//! ctx.set_field("tenant_id", "acme");
//!
//! let mut fields = serde_json::Map::new();
//! ctx.add_fields(&mut fields);
//! assert_eq!(fields["error"], "tenant lookup failed");
//! assert_eq!(fields["tenant_id"], "acme");
//! ```

use crate::Level;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Display;

/// Maximum number of errors retained per request unless configured otherwise.
pub const DEFAULT_MAX_ERRORS: usize = 5;

/// Separator used when several errors are folded into the `error` field.
const ERROR_SEPARATOR: &str = "; ";

#[derive(Debug, Default)]
struct Entries {
    errors: Vec<String>,
    fields: Map<String, Value>,
}

/// Request-scoped error and field accumulator.
///
/// Safe to share between the tasks handling one request (wrap it in an
/// `Arc`). Errors beyond `max_errors` are refused; a `max_errors` of zero
/// disables the cap.
#[derive(Debug)]
pub struct AccessLogContext {
    max_errors: usize,
    entries: Mutex<Entries>,
}

impl AccessLogContext {
    /// Create a context that keeps at most `max_errors` errors.
    pub fn new(max_errors: usize) -> Self {
        Self {
            max_errors,
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Configured error cap (0 means unbounded).
    pub fn max_errors(&self) -> usize {
        self.max_errors
    }

    /// Record an error.
    ///
    /// Returns `false` when the cap is reached and the error was dropped.
    pub fn push_error(&self, err: impl Display) -> bool {
        let mut entries = self.entries.lock();
        if self.max_errors > 0 && entries.errors.len() >= self.max_errors {
            return false;
        }
        entries.errors.push(err.to_string());
        true
    }

    /// Attach an extra field to the access-log entry.
    ///
    /// Values that fail to serialize are recorded as `null`.
    pub fn set_field(&self, key: impl Into<String>, value: impl Serialize) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.entries.lock().fields.insert(key.into(), value);
    }

    /// Number of errors currently held.
    pub fn error_count(&self) -> usize {
        self.entries.lock().errors.len()
    }

    /// Merge the accumulated errors and fields into `fields`.
    ///
    /// Errors land under `error`, joined with `"; "` when there are several.
    /// Fields set through [`set_field`](Self::set_field) are written after
    /// and overwrite existing keys.
    pub fn add_fields(&self, fields: &mut Map<String, Value>) {
        let entries = self.entries.lock();
        if !entries.errors.is_empty() {
            fields.insert(
                "error".to_string(),
                Value::String(entries.errors.join(ERROR_SEPARATOR)),
            );
        }
        for (key, value) in &entries.fields {
            fields.insert(key.clone(), value.clone());
        }
    }

    /// Emit the merged entry through the scopedoc logger.
    ///
    /// Logged at `ERROR` when any error was pushed, `INFO` otherwise.
    pub fn emit(&self, message: &str) {
        let mut fields = Map::new();
        self.add_fields(&mut fields);
        let level = if fields.contains_key("error") {
            Level::Error
        } else {
            Level::Info
        };
        crate::log_with_fields(level, "scopedoc::access", message, &fields);
    }
}

impl Default for AccessLogContext {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ERRORS)
    }
}
