//! Cached values and their expiry.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Type-erased payload shared between the entry map and waiters.
pub(crate) type AnyValue = Arc<dyn Any + Send + Sync>;

/// The last successful payload for a key and the instant it goes stale.
///
/// Entries are replaced wholesale on refresh, never updated in place.
#[derive(Clone)]
pub(crate) struct CacheEntry {
    pub(crate) value: AnyValue,
    expires_at: Instant,
}

impl CacheEntry {
    pub(crate) fn new(value: AnyValue, cached_at: Instant, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: cached_at + ttl,
        }
    }

    /// Fresh strictly before `expires_at`; a read at the expiry instant misses.
    pub(crate) fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}
