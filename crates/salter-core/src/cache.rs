//! In-memory response cache with TTL expiry and LRU capacity eviction.
//!
//! Cache operations never fail; a missing or expired value is an ordinary
//! outcome the caller interprets as "fetch again". Expired entries are
//! removed lazily on read so the map does not accumulate stale entries
//! between capacity evictions.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

/// Deterministic request fingerprint: operation name plus normalized
/// parameters. Parameters are kept sorted, so two logically identical
/// requests always produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: String,
    params: BTreeMap<String, String>,
}

impl CacheKey {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.operation)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={}", urlencoding::encode(value))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
    /// Logical clock tick of the last read or write, for LRU ordering.
    last_used: u64,
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<CacheKey, CacheEntry>,
    default_ttl: Duration,
    max_entries: usize,
    clock: u64,
}

impl CacheInner {
    fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            map: HashMap::new(),
            default_ttl,
            max_entries: max_entries.max(1),
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn get(&mut self, key: &CacheKey) -> Option<Value> {
        let now = Instant::now();
        let tick = self.clock + 1;
        match self.map.get_mut(key) {
            Some(entry) if entry.expires_at > now => {
                self.clock = tick;
                entry.last_used = tick;
                Some(entry.value.clone())
            }
            Some(_) => {
                // Lazy eviction: an expired entry is absent and gone.
                self.map.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&mut self, key: CacheKey, value: Value, ttl_override: Option<Duration>) {
        if self.default_ttl.is_zero() {
            return;
        }
        let ttl = ttl_override.unwrap_or(self.default_ttl);
        if ttl.is_zero() {
            return;
        }

        if !self.map.contains_key(&key) && self.map.len() >= self.max_entries {
            self.evict_lru();
        }

        let last_used = self.tick();
        self.map.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
                last_used,
            },
        );
    }

    fn evict_lru(&mut self) {
        let victim = self
            .map
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            self.map.remove(&key);
        }
    }

    fn invalidate(&mut self, key: &CacheKey) {
        self.map.remove(key);
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Thread-safe response cache shared by all client operations.
#[derive(Debug, Clone)]
pub struct CacheStore {
    inner: Arc<RwLock<CacheInner>>,
}

impl CacheStore {
    pub fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner::new(default_ttl, max_entries))),
        }
    }

    /// A cache where every put is a no-op and every get misses.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, 1)
    }

    /// Cached value for the key, if present and unexpired. A hit refreshes
    /// the key's LRU recency; an expired entry is removed on the spot.
    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        let mut store = self.inner.write().await;
        store.get(key)
    }

    /// Insert or overwrite. Evicts the least-recently-used entry first when
    /// the store is at capacity; eviction and insertion happen under one
    /// write lock, so readers never observe a partial update.
    pub async fn put(&self, key: CacheKey, value: Value, ttl_override: Option<Duration>) {
        let mut store = self.inner.write().await;
        store.put(key, value, ttl_override);
    }

    /// Remove a single entry. Idempotent.
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut store = self.inner.write().await;
        store.invalidate(key);
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.clear();
    }

    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.len()
    }

    pub async fn is_disabled(&self) -> bool {
        let store = self.inner.read().await;
        store.default_ttl.is_zero()
    }
}

/// Per-key mutexes that coalesce concurrent loads of the same key.
///
/// A caller that misses the cache takes the key's guard, re-checks the cache,
/// and only then runs its loader; everyone else queues on the same guard and
/// finds the value on the re-check. Guards are pruned once no caller holds
/// them.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlightGuards {
    inner: Arc<StdMutex<HashMap<CacheKey, Arc<Mutex<()>>>>>,
}

impl FlightGuards {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn guard(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        let mut guards = self.inner.lock().expect("flight guard map poisoned");
        guards
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub(crate) fn release(&self, key: &CacheKey, guard: &Arc<Mutex<()>>) {
        let mut guards = self.inner.lock().expect("flight guard map poisoned");
        // Two strong refs mean only the map and this caller hold the guard.
        if Arc::strong_count(guard) <= 2 {
            guards.remove(key);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().expect("flight guard map poisoned").len()
    }
}
