// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Configuration validator with rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a value can be used as a top-level document key.
    ///
    /// Keys must be non-empty, must not contain the `.` path separator and
    /// must not start with the `$` operator prefix.
    pub fn document_key(value: &str, field: &str) -> Result<()> {
        Self::not_empty(value, field)?;
        if value.contains('.') || value.starts_with('$') {
            return Err(ConfigError::ValidationError(format!(
                "{} must not contain '.' or start with '$'",
                field
            )));
        }
        Ok(())
    }
}
