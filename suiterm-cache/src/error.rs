//! Errors originating in the cache itself.

use crate::keys::CacheKey;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// Programmer error: two call sites disagree on a key's value type.
    #[error("Cache entry {key} does not hold a {expected}")]
    TypeMismatch { key: CacheKey, expected: &'static str },

    /// The fetcher panicked. Nothing was stored and the key is free again.
    #[error("Fetch for {key} panicked")]
    FetchPanicked { key: CacheKey },
}
