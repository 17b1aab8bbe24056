//! Error types for the bridge client and the store.

use std::sync::Arc;
use suiterm_cache::CacheError;
use suiterm_core::ValidationError;

/// Errors from talking to the bridge.
///
/// `Clone` so one failed fetch can be handed to every caller that was
/// waiting on it; transport errors are shared behind an `Arc`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(Arc<reqwest::Error>),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Bridge rejected request: {0}")]
    Rejected(String),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Serialization error: {0}")]
    Serde(Arc<serde_json::Error>),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(Arc::new(err))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by store actions.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("No active address; fetch addresses or switch to one first")]
    NoActiveAddress,
    #[error("Command arguments must not be empty")]
    EmptyCommand,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Top-level error for the `suiterm` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Logging(#[from] crate::logging::LoggingError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
