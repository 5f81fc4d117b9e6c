//! Inline result cache.
//!
//! Process-wide mapping from requested name to the platform `file_id` of
//! a previously uploaded GIF. Bounded LRU with per-name single-flight so
//! concurrent misses for the same name generate once.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;
use tracing::debug;

/// LRU map of name -> file id.
#[derive(Debug, Default)]
struct LruMap {
    entries: HashMap<String, String>,
    /// Keys ordered from least to most recently used.
    order: Vec<String>,
}

impl LruMap {
    fn touch(&mut self, name: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == name) {
            let key = self.order.remove(pos);
            self.order.push(key);
        }
    }

    fn get(&mut self, name: &str) -> Option<String> {
        let value = self.entries.get(name).cloned()?;
        self.touch(name);
        Some(value)
    }

    fn insert(&mut self, name: String, value: String, capacity: usize) {
        if self.entries.insert(name.clone(), value).is_none() {
            self.order.push(name);
        } else {
            self.touch(&name);
        }

        while self.entries.len() > capacity && !self.order.is_empty() {
            let evicted = self.order.remove(0);
            self.entries.remove(&evicted);
            debug!(name = %evicted, "Evicted inline cache entry");
        }
    }
}

/// Shared inline cache with single-flight generation.
#[derive(Debug)]
pub struct InlineCache {
    capacity: usize,
    map: StdMutex<LruMap>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl InlineCache {
    /// Create a cache bounded to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            map: StdMutex::new(LruMap::default()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Look up the cached file id for a name.
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.map.lock().expect("inline cache poisoned").get(name)
    }

    /// Store the file id for a name.
    pub fn store(&self, name: &str, file_id: &str) {
        self.map
            .lock()
            .expect("inline cache poisoned")
            .insert(name.to_string(), file_id.to_string(), self.capacity);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.map.lock().expect("inline cache poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a name to a file id, generating at most once per name.
    ///
    /// Concurrent callers for the same unseen name serialize on a
    /// per-name lock; later callers observe the first caller's stored
    /// result instead of regenerating. Failures are not cached.
    pub async fn get_or_insert_with<F, Fut, E>(&self, name: &str, generate: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(hit) = self.lookup(name) {
            return Ok(hit);
        }

        let key_lock = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(in_flight.entry(name.to_string()).or_default())
        };

        let result = {
            let _guard = key_lock.lock().await;

            // Another caller may have finished while we waited.
            if let Some(hit) = self.lookup(name) {
                Ok(hit)
            } else {
                match generate().await {
                    Ok(file_id) => {
                        self.store(name, &file_id);
                        Ok(file_id)
                    }
                    Err(e) => Err(e),
                }
            }
        };

        // Drop our clone first, then prune once only the map's own
        // reference remains. Every finisher drops before it checks, so
        // the last finisher to reach this point always removes the entry.
        drop(key_lock);
        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(name)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            in_flight.remove(name);
        }

        result
    }

    /// Number of in-flight generation locks (exposed for tests).
    pub async fn in_flight_len(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_lookup_and_store() {
        let cache = InlineCache::new(8);
        assert!(cache.lookup("Ana").is_none());

        cache.store("Ana", "file-1");
        assert_eq!(cache.lookup("Ana").as_deref(), Some("file-1"));
    }

    #[test]
    fn test_lru_eviction_at_capacity() {
        let cache = InlineCache::new(2);
        cache.store("a", "1");
        cache.store("b", "2");

        // Touch "a" so "b" is the eviction candidate.
        assert!(cache.lookup("a").is_some());

        cache.store("c", "3");
        assert_eq!(cache.len(), 2);
        assert!(cache.lookup("b").is_none());
        assert!(cache.lookup("a").is_some());
        assert!(cache.lookup("c").is_some());
    }

    #[tokio::test]
    async fn test_second_call_skips_generation() {
        let cache = InlineCache::new(8);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let file_id: Result<String, Infallible> = cache
                .get_or_insert_with("Ana", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("file-1".to_string())
                })
                .await;
            assert_eq!(file_id.unwrap(), "file-1");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_generate_once() {
        let cache = Arc::new(InlineCache::new(8));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    let result: Result<String, Infallible> = cache
                        .get_or_insert_with("Ana", || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                            Ok("file-1".to_string())
                        })
                        .await;
                    result.unwrap()
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), "file-1");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.in_flight_len().await, 0);
    }

    #[tokio::test]
    async fn test_in_flight_locks_are_pruned() {
        let cache = InlineCache::new(8);

        for name in ["Ana", "Bea", "Ana"] {
            let _: Result<String, Infallible> = cache
                .get_or_insert_with(name, || async { Ok("file-1".to_string()) })
                .await;
            assert_eq!(cache.in_flight_len().await, 0);
        }

        let failed: Result<String, &str> = cache
            .get_or_insert_with("Cleo", || async { Err("ffmpeg exploded") })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.in_flight_len().await, 0);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = InlineCache::new(8);
        let calls = AtomicUsize::new(0);

        let first: Result<String, &str> = cache
            .get_or_insert_with("Ana", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("ffmpeg exploded")
            })
            .await;
        assert!(first.is_err());
        assert!(cache.is_empty());

        let second: Result<String, &str> = cache
            .get_or_insert_with("Ana", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("file-2".to_string())
            })
            .await;
        assert_eq!(second.unwrap(), "file-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
