//! Key-value storage for the exact-match cache.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod redis_store;

#[cfg(test)]
mod tests;

pub use error::KvStoreError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MemoryKvStore;
pub use redis_store::RedisKvStore;

/// Minimal async interface over a string-to-string store.
pub trait KeyValueStore: Send + Sync {
    /// Returns `true` if the store answers requests.
    fn is_ready(&self) -> impl std::future::Future<Output = bool> + Send;

    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, KvStoreError>> + Send;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), KvStoreError>> + Send;
}
