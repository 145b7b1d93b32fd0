//! Scopedoc Logging
//!
//! Structured logging for the scopedoc crates, controlled through the
//! `SCOPEDOC_*` environment variables, plus the request-scoped
//! [`AccessLogContext`] that handlers push errors and fields into.
//!
//! # Usage
//!
//! ```rust
//! use scopedoc_log::{debug, info, warn, error, trace};
//!
//! debug!("Scoping document");
//! info!("Loaded {} tenants", 3);
//!
//! let key = "struct.nested_val";
//! debug!(target: "scopedoc::flatten", "Emitting leaf {}", key);
//! ```
//!
//! # Environment Variables
//!
//! - `SCOPEDOC_DEBUG=1` - Lower the threshold to at least debug
//! - `SCOPEDOC_LOG_LEVEL=trace|debug|info|warn|error|off` - Set the threshold
//! - `SCOPEDOC_LOG_FORMAT=json|pretty|compact` - Set output format
//! - `SCOPEDOC_LOG_TIMESTAMPS=1|0` - Include timestamps
//! - `SCOPEDOC_LOG_MODULE=1|0` - Include the record target
//!
//! The environment is read the first time any level is checked.

pub mod access;

pub use access::{AccessLogContext, DEFAULT_MAX_ERRORS};

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::env;
use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};

// ============================================================================
// Log Levels
// ============================================================================

/// Severity of a record; also used as the filtering threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    /// Threshold only: nothing is emitted
    Off = 5,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Timestamped columns
    Pretty,
    /// Single-letter level, short time
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Logging configuration read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `SCOPEDOC_DEBUG` was set
    pub debug: bool,
    /// Threshold from `SCOPEDOC_LOG_LEVEL`
    pub level: Level,
    pub format: Format,
    pub timestamps: bool,
    /// Include the record target
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            timestamps: true,
            module_path: true,
        }
    }
}

impl LogConfig {
    /// Read the `SCOPEDOC_*` variables of the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any variable lookup, missing or unparsable
    /// values falling back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            lookup(key).map(|v| v.trim() == "1" || v.trim().eq_ignore_ascii_case("true"))
        };
        let defaults = Self::default();

        Self {
            debug: flag("SCOPEDOC_DEBUG").unwrap_or(defaults.debug),
            level: lookup("SCOPEDOC_LOG_LEVEL")
                .and_then(|s| Level::parse(&s))
                .unwrap_or(defaults.level),
            format: lookup("SCOPEDOC_LOG_FORMAT")
                .and_then(|s| Format::parse(&s))
                .unwrap_or(defaults.format),
            timestamps: flag("SCOPEDOC_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps),
            module_path: flag("SCOPEDOC_LOG_MODULE").unwrap_or(defaults.module_path),
        }
    }

    /// Effective threshold: the configured level, lowered to `Debug` when
    /// debug mode is on.
    pub fn threshold(&self) -> Level {
        if self.debug {
            self.level.min(Level::Debug)
        } else {
            self.level
        }
    }
}

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

// Seeded from CONFIG on first access, so any level check reads the
// environment before answering.
static THRESHOLD: Lazy<AtomicU8> = Lazy::new(|| AtomicU8::new(CONFIG.threshold() as u8));

// ============================================================================
// Public API
// ============================================================================

/// Read the environment now instead of at the first level check.
pub fn init() {
    Lazy::force(&THRESHOLD);
}

/// Check if records at `level` are emitted.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    level != Level::Off && level as u8 >= THRESHOLD.load(Ordering::Relaxed)
}

/// The threshold currently in effect.
pub fn threshold() -> Level {
    Level::from_u8(THRESHOLD.load(Ordering::Relaxed))
}

/// Override the threshold at runtime.
pub fn set_level(level: Level) {
    THRESHOLD.store(level as u8, Ordering::SeqCst);
}

/// Get the global configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

// ============================================================================
// Log Output
// ============================================================================

#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    log_with_fields(level, target, message, &Map::new());
}

/// Log a message together with structured key/value fields.
///
/// In JSON format the fields are merged into the emitted object; the text
/// formats append them as `key=value` pairs.
pub fn log_with_fields(level: Level, target: &str, message: &str, fields: &Map<String, Value>) {
    if !is_level_enabled(level) {
        return;
    }

    let config = config();
    let line = match config.format {
        Format::Json => json_entry(level, target, message, fields).to_string(),
        Format::Pretty | Format::Compact => text_line(level, target, message, fields, config),
    };
    let _ = writeln!(std::io::stderr().lock(), "{}", line);
}

fn text_line(
    level: Level,
    target: &str,
    message: &str,
    fields: &Map<String, Value>,
    config: &LogConfig,
) -> String {
    let compact = config.format == Format::Compact;
    let mut line = String::new();

    if config.timestamps {
        let pattern = if compact {
            "%H:%M:%S"
        } else {
            "%Y-%m-%d %H:%M:%S%.3f"
        };
        line.push_str(&chrono::Local::now().format(pattern).to_string());
        line.push(' ');
    }

    if compact {
        line.push_str(&level.as_str()[..1]);
    } else {
        line.push_str(&format!("{:5}", level.as_str()));
    }
    line.push(' ');

    if config.module_path && !target.is_empty() {
        if compact {
            line.push_str(&format!("{}: ", target));
        } else {
            line.push_str(&format!("[{}] ", target));
        }
    }

    line.push_str(message);
    for (key, value) in fields {
        match value {
            Value::String(s) => line.push_str(&format!(" {}={:?}", key, s)),
            other => line.push_str(&format!(" {}={}", key, other)),
        }
    }
    line
}

/// Build the JSON object emitted for one record.
///
/// Reserved keys (`timestamp`, `level`, `target`, `message`) are written
/// last so caller fields cannot shadow them.
fn json_entry(level: Level, target: &str, message: &str, fields: &Map<String, Value>) -> Value {
    let mut entry = fields.clone();
    entry.insert(
        "timestamp".to_string(),
        Value::String(chrono::Utc::now().to_rfc3339()),
    );
    entry.insert("level".to_string(), Value::String(level.as_str().to_string()));
    entry.insert("target".to_string(), Value::String(target.to_string()));
    entry.insert("message".to_string(), Value::String(message.to_string()));
    Value::Object(entry)
}

// ============================================================================
// Macros
// ============================================================================

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:expr, target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($level) {
            $crate::log($level, $target, &format!($($arg)+));
        }
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::__log_at!($level, target: module_path!(), $($arg)+)
    };
}

/// Log a trace message.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Trace, $($arg)+) };
}

/// Log a debug message.
///
/// Emitted when `SCOPEDOC_DEBUG=1` or `SCOPEDOC_LOG_LEVEL` is `debug` or
/// lower.
///
/// ```rust
/// use scopedoc_log::debug;
///
/// let tenant = "acme";
/// debug!("Scoping document for tenant {}", tenant);
/// debug!(target: "scopedoc::tenancy", "Degraded to empty document");
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Debug, $($arg)+) };
}

/// Log an info message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Info, $($arg)+) };
}

/// Log a warning message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Warn, $($arg)+) };
}

/// Log an error message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Error, $($arg)+) };
}

// ============================================================================
// Tracing Integration
// ============================================================================

#[cfg(feature = "tracing")]
pub mod tracing_compat {
    //! Tracing compatibility layer.
    //!
    //! Builds a subscriber whose default filter follows the scopedoc
    //! threshold unless `RUST_LOG` overrides it.

    use super::*;

    /// Create a tracing subscriber that respects the scopedoc config.
    pub fn subscriber() -> impl tracing::Subscriber {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(threshold().as_str().to_ascii_lowercase()));

        tracing_subscriber::registry().with(filter).with(fmt::layer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse(" DEBUG "), Some(Level::Debug));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse("none"), Some(Level::Off));
        assert_eq!(Level::parse("invalid"), None);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("pretty"), Some(Format::Pretty));
        assert_eq!(Format::parse("Compact"), Some(Format::Compact));
        assert_eq!(Format::parse("xml"), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.threshold(), Level::Info);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = LogConfig::from_lookup(lookup(&[
            ("SCOPEDOC_LOG_LEVEL", "warn"),
            ("SCOPEDOC_LOG_FORMAT", "compact"),
            ("SCOPEDOC_LOG_TIMESTAMPS", "0"),
        ]));

        assert_eq!(config.level, Level::Warn);
        assert_eq!(config.format, Format::Compact);
        assert!(!config.timestamps);
        assert!(config.module_path);
    }

    #[test]
    fn test_debug_flag_lowers_threshold() {
        let config = LogConfig::from_lookup(lookup(&[("SCOPEDOC_DEBUG", "true")]));
        assert_eq!(config.threshold(), Level::Debug);

        let config = LogConfig::from_lookup(lookup(&[
            ("SCOPEDOC_DEBUG", "1"),
            ("SCOPEDOC_LOG_LEVEL", "trace"),
        ]));
        assert_eq!(config.threshold(), Level::Trace);
    }

    #[test]
    fn test_unparsable_level_falls_back() {
        let config = LogConfig::from_lookup(lookup(&[("SCOPEDOC_LOG_LEVEL", "loud")]));
        assert_eq!(config.level, Level::Info);
    }

    #[test]
    fn test_off_is_never_emitted() {
        assert!(!is_level_enabled(Level::Off));
    }

    #[test]
    fn test_text_line_layout() {
        let config = LogConfig {
            format: Format::Compact,
            timestamps: false,
            ..LogConfig::default()
        };
        let mut fields = Map::new();
        fields.insert("tenant".to_string(), Value::from("acme"));

        let line = text_line(Level::Warn, "scopedoc::test", "scoped", &fields, &config);
        assert_eq!(line, r#"W scopedoc::test: scoped tenant="acme""#);

        fields.insert("tenant".to_string(), Value::from(2));
        let line = text_line(Level::Error, "", "scoped", &fields, &config);
        assert_eq!(line, "E scoped tenant=2");

        let config = LogConfig {
            format: Format::Pretty,
            ..config
        };
        let line = text_line(Level::Info, "t", "m", &Map::new(), &config);
        assert_eq!(line, "INFO  [t] m");
    }

    #[test]
    fn test_json_entry_reserved_keys_win() {
        let mut fields = Map::new();
        fields.insert("message".to_string(), Value::from("spoofed"));
        fields.insert("status".to_string(), Value::from(200));

        let entry = json_entry(Level::Info, "scopedoc::test", "request done", &fields);

        assert_eq!(entry["message"], "request done");
        assert_eq!(entry["level"], "INFO");
        assert_eq!(entry["target"], "scopedoc::test");
        assert_eq!(entry["status"], 200);
        assert!(entry["timestamp"].is_string());
    }

    #[test]
    fn test_macros_expand() {
        trace!("trace message");
        debug!("debug message");
        info!("info message");
        warn!("warn message");
        error!("error message");

        debug!(target: "test", "with target");
        let x = 42;
        debug!("formatted: {}", x);
        info!(target: "test", "formatted: {}", x);
    }
}
