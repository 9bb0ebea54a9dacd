use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use super::KeyValueStore;
use super::error::KvStoreError;

#[derive(Default)]
struct Shared {
    entries: RwLock<HashMap<(i64, String), String>>,
    unavailable: AtomicBool,
}

/// In-memory store. Clones share data; [`with_db`](Self::with_db) selects a logical database.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    shared: Arc<Shared>,
    db: i64,
}

impl std::fmt::Debug for MemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryKvStore")
            .field("db", &self.db)
            .field("entries", &self.shared.entries.read().len())
            .finish()
    }
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle on database `db` sharing this store's data.
    pub fn with_db(&self, db: i64) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            db,
        }
    }

    pub fn db(&self) -> i64 {
        self.db
    }

    /// Number of keys in this handle's database.
    pub fn len(&self) -> usize {
        self.shared
            .entries
            .read()
            .keys()
            .filter(|(db, _)| *db == self.db)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes a raw value, bypassing availability checks.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.shared
            .entries
            .write()
            .insert((self.db, key.to_string()), value.to_string());
    }

    /// Makes every operation on every handle fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), KvStoreError> {
        if self.shared.unavailable.load(Ordering::SeqCst) {
            return Err(KvStoreError::Unavailable {
                message: "mock store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKvStore {
    async fn is_ready(&self) -> bool {
        self.check_available().is_ok()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError> {
        self.check_available()?;
        Ok(self
            .shared
            .entries
            .read()
            .get(&(self.db, key.to_string()))
            .cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        self.check_available()?;
        self.insert_raw(key, value);
        Ok(())
    }
}
