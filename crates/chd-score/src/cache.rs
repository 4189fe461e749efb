//! In-memory batch results with a fixed time-to-live.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Default lifetime of a cached batch.
pub const BATCH_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct CacheEntry<T> {
    expires_at: Instant,
    value: Arc<T>,
}

/// Expiring key-value store keyed by random batch ids.
///
/// Expired entries are swept on every insert and dropped when looked up.
#[derive(Debug)]
pub struct BatchCache<T> {
    ttl: Duration,
    entries: Mutex<HashMap<Uuid, CacheEntry<T>>>,
}

impl<T> BatchCache<T> {
    pub fn new() -> Self {
        Self::with_ttl(BATCH_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores a value under a fresh id.
    pub fn insert(&self, value: T) -> Uuid {
        self.insert_with(|_| value)
    }

    /// Stores the value built from the fresh id it will be stored under.
    pub fn insert_with(&self, build: impl FnOnce(Uuid) -> T) -> Uuid {
        let id = Uuid::new_v4();
        let value = Arc::new(build(id));
        let now = Instant::now();
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            id,
            CacheEntry {
                expires_at: now + self.ttl,
                value,
            },
        );
        id
    }

    /// The value stored under `id`, unless it has expired.
    pub fn get(&self, id: &Uuid) -> Option<Arc<T>> {
        let now = Instant::now();
        let mut entries = self.lock();
        let expired = entries.get(id)?.expires_at <= now;
        if expired {
            entries.remove(id);
            return None;
        }
        entries.get(id).map(|entry| Arc::clone(&entry.value))
    }

    /// Entries currently held, expired ones included until the next sweep.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries stay consistent across a panicking holder: every mutation is a
    /// single `retain`, `insert` or `remove`.
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for BatchCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
