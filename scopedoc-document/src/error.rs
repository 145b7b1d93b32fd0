//! Document errors

/// Errors raised while building documents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// A value that is neither a struct nor a mapping was passed where one
    /// of those is required. Carries the offending type name.
    #[error("[programming error] invalid argument type {0}, expected struct or map-like type")]
    InvalidArgumentType(String),

    /// A value without type information was found at the given key.
    #[error("uninspectable value at key {0:?}")]
    UninspectableValue(String),

    /// Two leaves resolved to the same dotted key.
    #[error("duplicate key {0:?} in flattened document")]
    DuplicateKey(String),

    /// A custom encoder reported a failure.
    #[error("failed to encode document: {0}")]
    EncodeFailure(String),

    /// Encoded bytes did not parse back into a document.
    #[error("failed to decode document: {0}")]
    DecodeFailure(String),
}

pub type Result<T> = std::result::Result<T, DocumentError>;
