use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, hash::Hash, sync::Mutex};

/// Write-once-read-many memoization with least-recently-used eviction and an optional
/// time-to-live. Entries are pure optimizations, losing one only costs a recomputation.
#[derive(Debug)]
pub struct ResultCache<K, V> {
    capacity: usize,
    ttl: Option<Duration>,
    state: Mutex<CacheState<K, V>>,
}

#[derive(Debug)]
struct CacheState<K, V> {
    tick: u64,
    entries: HashMap<K, CacheEntry<V>>,
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    inserted: DateTime<Utc>,
    last_used: u64,
}

impl<K, V> ResultCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            state: Mutex::new(CacheState {
                tick: 0,
                entries: HashMap::new(),
            }),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        // A poisoned lock only means another reader panicked, treat it as a miss
        let mut state = self.state.lock().ok()?;
        state.tick += 1;
        let tick = state.tick;

        let expired = match state.entries.get(key) {
            None => return None,
            Some(entry) => self.ttl.is_some_and(|ttl| now - entry.inserted > ttl),
        };

        if expired {
            state.entries.remove(key);
            return None;
        }

        state.entries.get_mut(key).map(|entry| {
            entry.last_used = tick;
            entry.value.clone()
        })
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Utc::now())
    }

    pub fn insert_at(&self, key: K, value: V, now: DateTime<Utc>) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.tick += 1;
        let tick = state.tick;

        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
            }
        }

        state.entries.insert(
            key,
            CacheEntry {
                value,
                inserted: now,
                last_used: tick,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
