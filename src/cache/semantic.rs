use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::error::{CacheResult, check_threshold};
use super::namespace::CacheNamespace;
use super::types::{CacheHit, CacheMetadata, CacheStrategy};
use crate::embedding::TextEmbedder;
use crate::hashing::{entry_id, query_fingerprint};
use crate::vectordb::{VectorPoint, VectorStore, WriteConsistency};

/// Default cosine-distance threshold.
pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 0.1;
/// Candidates fetched per lookup.
pub const DEFAULT_SEARCH_LIMIT: u64 = 4;

/// Semantic cache: a hit requires an entry within the distance threshold.
pub struct SemanticCache<V: VectorStore> {
    store: V,
    embedder: Arc<TextEmbedder>,
    namespace: CacheNamespace,
    threshold: f32,
}

impl<V: VectorStore> std::fmt::Debug for SemanticCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticCache")
            .field("namespace", &self.namespace)
            .field("threshold", &self.threshold)
            .field("embedder", &self.embedder)
            .finish_non_exhaustive()
    }
}

impl<V: VectorStore> SemanticCache<V> {
    /// Fails with [`InvalidThreshold`](super::CacheError::InvalidThreshold) outside `[0, 1]`.
    pub fn new(
        store: V,
        embedder: Arc<TextEmbedder>,
        namespace: CacheNamespace,
        threshold: f32,
    ) -> CacheResult<Self> {
        Ok(Self {
            store,
            embedder,
            namespace,
            threshold: check_threshold(threshold)?,
        })
    }

    pub fn namespace(&self) -> CacheNamespace {
        self.namespace
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn store_handle(&self) -> &V {
        &self.store
    }

    pub fn is_embedder_stub(&self) -> bool {
        self.embedder.is_stub()
    }

    pub async fn is_ready(&self) -> bool {
        self.store.is_ready().await
    }

    /// Creates the backing collection if it does not exist.
    pub async fn ensure_collection(&self) -> CacheResult<()> {
        self.store
            .ensure_collection(&self.namespace.collection(), self.embedder.dimension() as u64)
            .await?;
        Ok(())
    }

    /// Returns the closest entry within `threshold` (or the instance default).
    #[instrument(skip(self, query), fields(dialect = %self.namespace.dialect(), query = %query_fingerprint(query)))]
    pub async fn lookup(&self, query: &str, threshold: Option<f32>) -> CacheResult<Option<CacheHit>> {
        let threshold = match threshold {
            Some(t) => check_threshold(t)?,
            None => self.threshold,
        };

        let vector = self.embedder.embed(query).await?;
        let results = self
            .store
            .search(&self.namespace.collection(), vector, DEFAULT_SEARCH_LIMIT)
            .await?;

        let nearest = results.first().map(|r| r.distance());
        let Some(best) = results.into_iter().find(|r| r.distance() <= threshold) else {
            debug!(threshold, nearest, "Semantic cache miss");
            return Ok(None);
        };

        let distance = best.distance();
        info!(distance, threshold, "Semantic cache hit");

        Ok(Some(CacheHit {
            response: best.response,
            metadata: CacheMetadata {
                generated_at: best.generated_at,
                dialect: self.namespace.dialect(),
                strategy: CacheStrategy::Semantic,
            },
            distance: Some(distance),
        }))
    }

    /// Indexes `response` under the embedding of `query`. Re-storing a query replaces it.
    #[instrument(skip(self, query, response, metadata), fields(dialect = %self.namespace.dialect(), query = %query_fingerprint(query)))]
    pub async fn store(
        &self,
        query: &str,
        response: &str,
        metadata: &CacheMetadata,
    ) -> CacheResult<u64> {
        let collection = self.namespace.collection();
        let vector = self.embedder.embed(query).await?;
        let id = entry_id(&collection, query);

        let point = VectorPoint::new(id, vector, query, response)
            .with_dialect(self.namespace.dialect().as_str())
            .with_generated_at(metadata.generated_at);

        self.store
            .upsert(&collection, point, WriteConsistency::Strong)
            .await?;
        debug!(point_id = id, "Semantic cache entry stored");
        Ok(id)
    }
}
