//! Error types shared across the engine
//!
//! Every compile-time failure raised while turning declarative definitions
//! into render pipelines is a [`HudError`]. None of them are fatal: the reload
//! skips the offending element and keeps going.

use crate::config::ConfigError;
use crate::placeholder::ValueKind;

/// Result type for compile-time operations
pub type HudResult<T> = Result<T, HudError>;

/// Errors raised while compiling definitions
#[derive(Debug, thiserror::Error)]
pub enum HudError {
    /// A placeholder or producer name is not registered
    #[error("unknown placeholder: {0}")]
    UnknownPlaceholder(String),

    /// A placeholder was referenced with the wrong number of arguments
    #[error("placeholder '{name}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        /// Placeholder name
        name: String,
        /// Declared argument count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// Two compared producers yield different value kinds
    #[error("type mismatch: {first} and {second}")]
    KindMismatch {
        /// Kind of the first producer
        first: ValueKind,
        /// Kind of the second producer
        second: ValueKind,
    },

    /// A producer has the wrong kind for the place it is used in
    #[error("placeholder '{name}' is not a {expected}")]
    UnexpectedKind {
        /// Placeholder reference as written
        name: String,
        /// Kind required by the caller
        expected: ValueKind,
    },

    /// The comparison operation is not defined for the value kind
    #[error("unsupported operation for {kind}: {operation}")]
    UnsupportedOperation {
        /// Value kind of both operands
        kind: ValueKind,
        /// Operation as written
        operation: String,
    },

    /// A condition gate other than `and`/`or`
    #[error("this gate doesn't exist: {0}")]
    UnknownGate(String),

    /// A referenced resource (image, text font, background, head) is missing
    #[error("{kind} doesn't exist: {name}")]
    MissingResource {
        /// Resource category
        kind: &'static str,
        /// Resource name
        name: String,
    },

    /// A numeric or structural field is out of its valid range
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Field name as written in the definition
        field: &'static str,
        /// Human readable reason
        reason: String,
    },

    /// The number equation could not be parsed
    #[error("invalid equation '{expression}': {reason}")]
    Equation {
        /// Source expression
        expression: String,
        /// Parser message
        reason: String,
    },

    /// The number format pattern could not be parsed
    #[error("invalid number format '{0}'")]
    NumberFormat(String),

    /// A pattern failed to compile
    #[error("invalid pattern: {0}")]
    Pattern(String),

    /// Resource probing failed
    #[error("unable to read image '{path}': {reason}")]
    Probe {
        /// File that was probed
        path: String,
        /// Underlying error message
        reason: String,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while writing a generated resource pack
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// A file could not be written
    #[error("unable to write '{path}': {source}")]
    Io {
        /// Target file
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// A document could not be serialized
    #[error("unable to serialize '{path}': {source}")]
    Json {
        /// Target file
        path: String,
        /// Underlying error
        source: serde_json::Error,
    },

    /// A texture could not be encoded
    #[error("unable to encode '{path}': {source}")]
    Image {
        /// Target file
        path: String,
        /// Underlying error
        source: image::ImageError,
    },
}

impl HudError {
    /// Shorthand for [`HudError::InvalidField`]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`HudError::MissingResource`]
    pub fn missing(kind: &'static str, name: impl Into<String>) -> Self {
        Self::MissingResource {
            kind,
            name: name.into(),
        }
    }
}
