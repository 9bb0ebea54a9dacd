use tracing::{debug, instrument, warn};

use super::error::{CacheError, CacheResult};
use super::namespace::CacheNamespace;
use super::types::{CacheHit, CacheMetadata, ExactEntry};
use crate::hashing::query_fingerprint;
use crate::kvstore::KeyValueStore;

/// Exact-match cache: a hit requires the byte-identical query.
pub struct ExactMatchCache<K: KeyValueStore> {
    store: K,
    namespace: CacheNamespace,
}

impl<K: KeyValueStore> std::fmt::Debug for ExactMatchCache<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExactMatchCache")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl<K: KeyValueStore> ExactMatchCache<K> {
    /// `store` must already be bound to `namespace.db_index()`.
    pub fn new(store: K, namespace: CacheNamespace) -> Self {
        Self { store, namespace }
    }

    pub fn namespace(&self) -> CacheNamespace {
        self.namespace
    }

    pub fn store_handle(&self) -> &K {
        &self.store
    }

    pub async fn is_ready(&self) -> bool {
        self.store.is_ready().await
    }

    #[instrument(skip(self, query), fields(dialect = %self.namespace.dialect(), query = %query_fingerprint(query)))]
    pub async fn lookup(&self, query: &str) -> CacheResult<Option<CacheHit>> {
        let Some(raw) = self.store.get(&self.namespace.exact_key(query)).await? else {
            debug!("Exact cache miss");
            return Ok(None);
        };

        match serde_json::from_str::<ExactEntry>(&raw) {
            Ok(entry) => {
                debug!("Exact cache hit");
                Ok(Some(CacheHit {
                    response: entry.response,
                    metadata: entry.metadata,
                    distance: None,
                }))
            }
            Err(e) => {
                warn!(error = %e, "Undecodable exact cache entry, treating as miss");
                Ok(None)
            }
        }
    }

    /// Writes `response` under `query`, overwriting any previous entry.
    #[instrument(skip(self, query, response, metadata), fields(dialect = %self.namespace.dialect(), query = %query_fingerprint(query)))]
    pub async fn store(
        &self,
        query: &str,
        response: &str,
        metadata: &CacheMetadata,
    ) -> CacheResult<()> {
        let entry = ExactEntry {
            response: response.to_string(),
            metadata: metadata.clone(),
        };
        let encoded = serde_json::to_string(&entry).map_err(|e| CacheError::Encode {
            reason: e.to_string(),
        })?;

        self.store
            .set(&self.namespace.exact_key(query), &encoded)
            .await?;
        debug!("Exact cache entry stored");
        Ok(())
    }
}
