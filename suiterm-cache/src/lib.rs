//! Request cache with TTL entries and in-flight deduplication.
//!
//! The store asks this crate for every backend read. A read is answered
//! from a fresh entry when one exists; otherwise exactly one fetch per key
//! is allowed in flight and every concurrent caller awaits that same fetch.
//!
//! # Keys
//!
//! [`CacheKey`] is a closed enum, one variant per resource, carrying only the
//! parameters that identify the resource. Two call sites naming the same
//! resource therefore always land on the same entry, and [`KeyPattern`]
//! matches whole families without string globbing.
//!
//! # Example
//!
//! ```ignore
//! let cache: RequestCache<ClientError> = RequestCache::new();
//! let key = CacheKey::gas_coins(&address);
//! let coins = cache
//!     .dedupe(key, Duration::from_secs(3), move || async move {
//!         backend.get_gas_coins(&address).await
//!     })
//!     .await?;
//!
//! // After a split, force the next read to hit the backend.
//! cache.invalidate(&CacheKey::gas_coins(&address));
//! ```

mod entry;
pub mod error;
pub mod keys;
pub mod request_cache;
pub mod stats;

pub use error::CacheError;
pub use keys::{CacheKey, KeyFamily, KeyPattern};
pub use request_cache::RequestCache;
pub use stats::CacheStats;
