//! TTL-bound in-process cache with cache-aside orchestration.
//!
//! The store holds serialized values keyed by resource. Expiry is lazy: an
//! expired entry stays in the map and is treated as a miss on the next read.
//! There is no single-flight deduplication; concurrent misses for the same
//! key may each invoke the producer and race to write, which is benign
//! because producers are idempotent reads against the ERP.

mod keys;

pub use keys::{CacheGroup, CacheKey};

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source for entry validity checks. Injectable so tests can drive the
/// clock deterministically.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for tests; shared handles observe `advance` calls.
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<Instant>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Instant::now())))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.0.lock().expect("clock lock poisoned")
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_valid(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }
}

/// Presence flags for the primary cache keys, reported by the status
/// endpoint. A key counts as present only while its entry is still valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub has_products: bool,
    pub has_categories: bool,
    pub has_public_categories: bool,
    pub has_ribbons: bool,
    pub has_bestsellers: bool,
    pub has_new_arrivals: bool,
}

/// Keyed, TTL-bound store shared by all request handlers.
///
/// Constructed once at process start and handed to the route layer by
/// reference; nothing else retains cached values, so a clear is immediately
/// observable by the next request.
pub struct CacheStore<C: Clock = SystemClock> {
    entries: DashMap<String, CacheEntry>,
    clock: C,
}

impl CacheStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for CacheStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CacheStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Returns the cached value while it is still within its TTL.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let entry = self.entries.get(&key.to_string())?;
        entry
            .is_valid(self.clock.now())
            .then(|| entry.data.clone())
    }

    /// Stores a value wholesale, replacing any previous entry. Last writer
    /// wins; racing writers compute equivalent content.
    pub fn set(&self, key: &CacheKey, data: Value, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                data,
                stored_at: self.clock.now(),
                ttl,
            },
        );
    }

    /// Removes every entry in the group and returns how many were removed,
    /// expired entries included.
    pub fn clear(&self, group: CacheGroup) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !group.matches(key));
        before.saturating_sub(self.entries.len())
    }

    pub fn stats(&self) -> CacheStats {
        use crate::domain::category::CategoryScope;

        CacheStats {
            has_products: self.get(&CacheKey::Products).is_some(),
            has_categories: self
                .get(&CacheKey::Categories(CategoryScope::Internal))
                .is_some(),
            has_public_categories: self
                .get(&CacheKey::Categories(CategoryScope::Public))
                .is_some(),
            has_ribbons: self.get(&CacheKey::Ribbons).is_some(),
            has_bestsellers: self.get(&CacheKey::Bestsellers).is_some(),
            has_new_arrivals: self.get(&CacheKey::NewArrivals).is_some(),
        }
    }
}

/// Cache-aside read: return the cached value if valid, otherwise run the
/// producer and populate the cache from its result.
///
/// Producer failures propagate untouched and leave the store exactly as it
/// was: an absent key stays absent (the next request retries immediately)
/// and a stale entry is not overwritten. A cached value that no longer
/// deserializes into `T` is treated as a miss and recomputed.
pub async fn get_cached_or_fetch<T, C, F, Fut, E>(
    store: &CacheStore<C>,
    key: CacheKey,
    ttl: Duration,
    producer: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    C: Clock,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(value) = store.get(&key) {
        match serde_json::from_value(value) {
            Ok(data) => return Ok(data),
            Err(e) => {
                log::warn!("discarding undecodable cache entry for {key}: {e}");
            }
        }
    }

    let data = producer().await?;

    match serde_json::to_value(&data) {
        Ok(value) => store.set(&key, value, ttl),
        Err(e) => log::warn!("skipping cache population for {key}: {e}"),
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TTL: Duration = Duration::from_secs(60);
    const EPSILON: Duration = Duration::from_millis(1);

    #[test]
    fn entry_valid_strictly_inside_ttl() {
        let clock = ManualClock::new();
        let store = CacheStore::with_clock(clock.clone());
        store.set(&CacheKey::Ribbons, json!([1, 2]), TTL);

        clock.advance(TTL - EPSILON);
        assert_eq!(store.get(&CacheKey::Ribbons), Some(json!([1, 2])));

        clock.advance(EPSILON);
        assert_eq!(store.get(&CacheKey::Ribbons), None);
    }

    #[test]
    fn set_overwrites_wholesale() {
        let store = CacheStore::new();
        store.set(&CacheKey::Ribbons, json!(["old"]), TTL);
        store.set(&CacheKey::Ribbons, json!(["new"]), TTL);
        assert_eq!(store.get(&CacheKey::Ribbons), Some(json!(["new"])));
    }

    #[test]
    fn clear_counts_expired_entries_too() {
        use crate::domain::category::CategoryScope;
        use crate::domain::types::CategoryId;

        let clock = ManualClock::new();
        let store = CacheStore::with_clock(clock.clone());
        store.set(&CacheKey::Products, json!([]), TTL);
        store.set(
            &CacheKey::ProductsByCategory(CategoryScope::Public, CategoryId::new(3).unwrap()),
            json!([]),
            TTL,
        );
        store.set(&CacheKey::Categories(CategoryScope::Public), json!([]), TTL);

        clock.advance(TTL * 2);

        assert_eq!(store.clear(CacheGroup::Products), 2);
        assert_eq!(store.clear(CacheGroup::Products), 0);
        assert_eq!(store.clear(CacheGroup::All), 1);
    }

    #[actix_rt::test]
    async fn fetches_once_within_ttl() {
        let clock = ManualClock::new();
        let store = CacheStore::with_clock(clock.clone());
        let mut calls = 0u32;

        for _ in 0..3 {
            let value: Result<Vec<u32>, ()> =
                get_cached_or_fetch(&store, CacheKey::Products, TTL, || {
                    calls += 1;
                    async { Ok(vec![1, 2, 3]) }
                })
                .await;
            assert_eq!(value.unwrap(), vec![1, 2, 3]);
        }
        assert_eq!(calls, 1);

        clock.advance(TTL + EPSILON);
        let value: Result<Vec<u32>, ()> =
            get_cached_or_fetch(&store, CacheKey::Products, TTL, || {
                calls += 1;
                async { Ok(vec![4]) }
            })
            .await;
        assert_eq!(value.unwrap(), vec![4]);
        assert_eq!(calls, 2);
    }

    #[actix_rt::test]
    async fn producer_failure_does_not_poison_the_cache() {
        let store = CacheStore::new();

        let failed: Result<Vec<u32>, &str> =
            get_cached_or_fetch(&store, CacheKey::Products, TTL, || async { Err("erp down") })
                .await;
        assert_eq!(failed.unwrap_err(), "erp down");
        // Absent stays absent; the next call retries the producer.
        assert_eq!(store.get(&CacheKey::Products), None);

        let recovered: Result<Vec<u32>, &str> =
            get_cached_or_fetch(&store, CacheKey::Products, TTL, || async { Ok(vec![9]) }).await;
        assert_eq!(recovered.unwrap(), vec![9]);
    }

    #[actix_rt::test]
    async fn producer_failure_leaves_stale_entry_untouched() {
        let clock = ManualClock::new();
        let store = CacheStore::with_clock(clock.clone());
        store.set(&CacheKey::Ribbons, json!([7]), TTL);
        clock.advance(TTL * 2);

        let failed: Result<Vec<u32>, &str> =
            get_cached_or_fetch(&store, CacheKey::Ribbons, TTL, || async { Err("erp down") })
                .await;
        assert!(failed.is_err());
        // The expired entry is still there, untouched, and still invalid.
        assert_eq!(store.get(&CacheKey::Ribbons), None);
        assert_eq!(store.clear(CacheGroup::Ribbons), 1);
    }

    #[actix_rt::test]
    async fn undecodable_hit_falls_through_to_producer() {
        let store = CacheStore::new();
        store.set(&CacheKey::Ribbons, json!("not a list"), TTL);

        let value: Result<Vec<u32>, ()> =
            get_cached_or_fetch(&store, CacheKey::Ribbons, TTL, || async { Ok(vec![5]) }).await;
        assert_eq!(value.unwrap(), vec![5]);
        // Recomputed value replaced the bad entry.
        assert_eq!(store.get(&CacheKey::Ribbons), Some(json!([5])));
    }

    #[test]
    fn stats_reflect_validity_not_presence() {
        let clock = ManualClock::new();
        let store = CacheStore::with_clock(clock.clone());
        store.set(&CacheKey::Products, json!([]), TTL);
        store.set(&CacheKey::Ribbons, json!([]), TTL);
        store.set(&CacheKey::NewArrivals, json!([]), TTL);

        let stats = store.stats();
        assert!(stats.has_products);
        assert!(stats.has_ribbons);
        assert!(stats.has_new_arrivals);
        assert!(!stats.has_categories);
        assert!(!stats.has_bestsellers);

        clock.advance(TTL * 2);
        let stats = store.stats();
        assert!(!stats.has_products);
        assert!(!stats.has_ribbons);
        assert!(!stats.has_new_arrivals);
    }
}
