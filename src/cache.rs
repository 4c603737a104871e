//! Keyed memoization for expensive async derivations.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

/// Memoizes an async derivation per key for the lifetime of the process.
///
/// The first caller for a key runs the derivation; callers arriving while it
/// is in flight await the same computation instead of starting their own.
/// A successful result is cached permanently and returned without re-invoking
/// the derivation. A failed attempt leaves the cell empty, so the error is
/// not cached: the next caller (or a concurrently waiting one) runs a fresh
/// attempt.
pub struct MemoCache<K, V> {
    cells: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, initializing it with `init` if
    /// absent. At most one `init` future runs per key at any moment.
    pub async fn get_or_try_init<F, Fut, E>(&self, key: K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = {
            let mut cells = self.cells.lock().await;
            cells
                .entry(key)
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        cell.get_or_try_init(init).await.map(V::clone)
    }
}

impl<K, V> Default for MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
