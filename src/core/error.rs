//! Error types for metadata operations
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Error types for metadata operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    /// A required argument was empty or otherwise unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Property not found
    #[error("Property not found: {0}")]
    NotFound(String),

    /// A stored or encoded value does not parse as the requested type
    #[error("Parse error: cannot read '{key}' from {value:?}")]
    ParseError {
        /// Property or field name being read
        key: String,
        /// The offending text
        value: String,
    },

    /// A struct property holds a payload of the wrong length
    #[error("Size mismatch for '{key}': expected {expected} bytes, found {actual}")]
    SizeMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    /// Index outside of a fixed-size array
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A node was offered as its own descendant
    #[error("A node cannot be appended to itself")]
    SelfReference,

    /// An update was requested from text without a query part
    #[error("No '?' query separator in encoded locator")]
    NoQuery,

    /// A percent-escape with non-hex digits (strict decoding only)
    #[error("Malformed percent-escape at byte {offset}")]
    MalformedEscape { offset: usize },
}

/// Result type alias for metadata operations
pub type MetaResult<T> = Result<T, MetaError>;
