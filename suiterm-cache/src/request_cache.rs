//! TTL request cache with single-flight fetches.
//!
//! Both maps live behind one mutex that is never held across an await, so
//! "check entry, check in-flight, register fetch" happens atomically and at
//! most one fetch per key is ever outstanding.

use std::any::type_name;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use suiterm_core::sanitize_output;
use tokio::time::Instant;

use crate::entry::{AnyValue, CacheEntry};
use crate::error::CacheError;
use crate::keys::{CacheKey, KeyPattern};
use crate::stats::CacheStats;

type SharedFetch<E> = Shared<BoxFuture<'static, Result<AnyValue, E>>>;

struct CacheState<E> {
    entries: HashMap<CacheKey, CacheEntry>,
    in_flight: HashMap<CacheKey, SharedFetch<E>>,
    stats: CacheStats,
}

impl<E> Default for CacheState<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            stats: CacheStats::default(),
        }
    }
}

/// Request cache shared by every fetch the store performs.
///
/// `E` is the fetchers' error type. It is `Clone` because one failed fetch
/// is handed to every caller that was waiting on it, and `From<CacheError>`
/// so cache-side programmer errors travel through the same channel.
pub struct RequestCache<E> {
    inner: Arc<Mutex<CacheState<E>>>,
}

impl<E> Clone for RequestCache<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for RequestCache<E> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheState::default())),
        }
    }
}

fn lock_state<E>(inner: &Mutex<CacheState<E>>) -> MutexGuard<'_, CacheState<E>> {
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("request cache lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

fn downcast<T, E>(key: &CacheKey, value: AnyValue) -> Result<T, E>
where
    T: Clone + 'static,
    E: From<CacheError>,
{
    value.downcast_ref::<T>().cloned().ok_or_else(|| {
        E::from(CacheError::TypeMismatch {
            key: key.clone(),
            expected: type_name::<T>(),
        })
    })
}

impl<E> RequestCache<E>
where
    E: Clone + Send + Sync + From<CacheError> + std::fmt::Display + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or fetch it once for everyone.
    ///
    /// * fresh entry: returned without calling `fetcher`;
    /// * fetch in flight: awaits that fetch;
    /// * otherwise: runs `fetcher`, stores the value for `ttl` on success.
    ///
    /// A failed fetch stores nothing and is not remembered; every waiter
    /// receives the same error and the next call fetches again. A panicking
    /// fetcher counts as a failure (`CacheError::FetchPanicked`). Once issued
    /// a fetch runs to completion even if all callers stop waiting.
    pub async fn dedupe<T, F, Fut>(&self, key: CacheKey, ttl: Duration, fetcher: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let pending = {
            let mut state = lock_state(&self.inner);
            let now = Instant::now();

            let fresh = state
                .entries
                .get(&key)
                .filter(|entry| entry.is_fresh(now))
                .map(|entry| Arc::clone(&entry.value));
            if let Some(value) = fresh {
                state.stats.hits += 1;
                drop(state);
                tracing::debug!(key = %key, "cache hit");
                return downcast(&key, value);
            }

            let outstanding = state.in_flight.get(&key).cloned();
            match outstanding {
                Some(shared) => {
                    state.stats.joined += 1;
                    drop(state);
                    tracing::debug!(key = %key, "joining in-flight fetch");
                    shared
                }
                None => {
                    state.stats.misses += 1;
                    let shared = self.spawn_fetch(key.clone(), ttl, fetcher);
                    state.in_flight.insert(key.clone(), shared.clone());
                    drop(state);
                    tracing::debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "cache miss, fetching");
                    shared
                }
            }
        };

        let value = pending.await?;
        downcast(&key, value)
    }

    /// Build the shared fetch future and, inside a runtime, drive it from a
    /// detached task so it completes regardless of its callers.
    fn spawn_fetch<T, F, Fut>(&self, key: CacheKey, ttl: Duration, fetcher: F) -> SharedFetch<E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let fetch = async move {
            let outcome = AssertUnwindSafe(async move { fetcher().await })
                .catch_unwind()
                .await;
            let result = match outcome {
                Ok(result) => result.map(|value| Arc::new(value) as AnyValue),
                Err(_) => Err(E::from(CacheError::FetchPanicked { key: key.clone() })),
            };

            let mut state = lock_state(&inner);
            state.in_flight.remove(&key);
            match &result {
                Ok(value) => {
                    let entry = CacheEntry::new(Arc::clone(value), Instant::now(), ttl);
                    state.entries.insert(key.clone(), entry);
                }
                Err(err) => {
                    state.stats.fetch_failures += 1;
                    let error = sanitize_output(&err.to_string());
                    tracing::warn!(key = %key, error = %error, "fetch failed, nothing cached");
                }
            }
            result
        }
        .boxed()
        .shared();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(fetch.clone());
        }
        fetch
    }

    /// Remove one entry. Idempotent; an in-flight fetch for the key is left
    /// alone and repopulates the entry when it settles.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let mut state = lock_state(&self.inner);
        let removed = state.entries.remove(key).is_some();
        if removed {
            state.stats.invalidations += 1;
        }
        drop(state);
        tracing::debug!(key = %key, removed, "invalidated key");
        removed
    }

    /// Remove every entry matching `pattern`; returns how many were removed.
    pub fn invalidate_pattern(&self, pattern: &KeyPattern) -> usize {
        let mut state = lock_state(&self.inner);
        let before = state.entries.len();
        state.entries.retain(|key, _| !pattern.matches(key));
        let removed = before - state.entries.len();
        state.stats.invalidations += removed as u64;
        drop(state);
        tracing::debug!(pattern = %pattern, removed, "invalidated pattern");
        removed
    }

    /// Whether an entry (fresh or stale) is stored for `key`.
    pub fn contains(&self, key: &CacheKey) -> bool {
        lock_state(&self.inner).entries.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        let state = lock_state(&self.inner);
        CacheStats {
            entry_count: state.entries.len() as u64,
            in_flight: state.in_flight.len() as u64,
            ..state.stats.clone()
        }
    }
}
