//! Request-scoped memoization.
//!
//! A [`RequestMemo`] lives as long as the value that owns it (one browser per
//! request). The lock is never held across an await: concurrent callers may
//! both compute a missing value, and the first one stored wins.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use parking_lot::Mutex;

/// Memo of async computations keyed by their arguments.
#[derive(Debug)]
pub struct RequestMemo<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for RequestMemo<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> RequestMemo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().get(key).cloned()
    }

    /// Return the cached value for `key`, or run `compute` and cache its
    /// result. Errors are returned and not cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cached = self.get(&key);
        if let Some(value) = cached {
            return Ok(value);
        }
        let value = compute().await?;
        let stored = self.entries.lock().entry(key).or_insert(value).clone();
        Ok(stored)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn computes_once_per_key() {
        let memo: RequestMemo<u32, u32> = RequestMemo::new();
        let calls = AtomicU32::new(0);
        for _ in 0..3 {
            let v = memo
                .get_or_try_insert_with(7, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(49)
                })
                .await
                .unwrap();
            assert_eq!(v, 49);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(memo.len(), 1);
        assert_eq!(memo.get(&7), Some(49));
        assert_eq!(memo.get(&8), None);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let memo: RequestMemo<&str, u32> = RequestMemo::new();
        let err = memo
            .get_or_try_insert_with("k", || async { Err::<u32, _>("boom") })
            .await;
        assert_eq!(err, Err("boom"));
        assert!(memo.is_empty());
        let ok = memo
            .get_or_try_insert_with("k", || async { Ok::<_, &str>(1) })
            .await;
        assert_eq!(ok, Ok(1));
    }
}
