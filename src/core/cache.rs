use async_trait::async_trait;
use std::hash::Hash;
use std::time::Duration;

/// A key-value cache where entries may expire after a time-to-live.
#[async_trait]
pub trait Cache<K, V>: Send + Sync
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Option<V>;

    /// Stores `value`; `None` for `ttl` keeps the entry until removed.
    async fn put(&self, key: K, value: V, ttl: Option<Duration>);

    async fn remove(&self, key: &K);

    async fn clear(&self);
}
