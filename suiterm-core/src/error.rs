//! Error types for suiterm payloads

use thiserror::Error;

/// Errors raised while parsing a [`crate::SuiAddress`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address is empty")]
    Empty,

    #[error("Address must start with 0x: {input}")]
    MissingPrefix { input: String },

    #[error("Address has no hex digits after 0x")]
    NoDigits,

    #[error("Address has {len} hex digits, at most 64 allowed")]
    TooLong { len: usize },

    #[error("Address contains non-hex characters: {input}")]
    InvalidHex { input: String },
}

/// Validation errors for request payloads built by the store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
