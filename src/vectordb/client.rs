use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use tracing::{debug, info};

use super::error::VectorDbError;
use super::model::{SearchResult, VectorPoint, rank_results};
use crate::vectordb::WriteConsistency;

#[derive(Clone)]
/// Direct Qdrant client wrapper.
pub struct QdrantVectorStore {
    client: Qdrant,
    url: String,
}

impl std::fmt::Debug for QdrantVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantVectorStore")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl QdrantVectorStore {
    /// Creates a client for `url`. No request is made until first use.
    pub fn new(url: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn create_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let vectors_config = VectorParamsBuilder::new(vector_size, Distance::Cosine);

        self.client
            .create_collection(CreateCollectionBuilder::new(name).vectors_config(vectors_config))
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        info!(collection = name, vector_size, "Created Qdrant collection");
        Ok(())
    }
}

/// Minimal async interface used by the semantic cache.
pub trait VectorStore: Send + Sync {
    /// Returns `true` if the store answers requests.
    fn is_ready(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Ensures a cosine-distance collection exists.
    fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Inserts or replaces a point by id.
    fn upsert(
        &self,
        collection: &str,
        point: VectorPoint,
        consistency: WriteConsistency,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Returns up to `limit` results ordered by [`rank_results`].
    fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, VectorDbError>> + Send;
}

impl VectorStore for QdrantVectorStore {
    async fn is_ready(&self) -> bool {
        self.health_check().await.is_ok()
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let exists = self.client.collection_exists(name).await.map_err(|e| {
            VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            }
        })?;

        if !exists {
            self.create_collection(name, vector_size).await?;
        }

        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        point: VectorPoint,
        consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        let payload = point.payload();
        let qdrant_point = PointStruct::new(point.id, point.vector, payload);

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(collection, vec![qdrant_point]).wait(consistency.into()),
            )
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchResult>, VectorDbError> {
        let search_result = self
            .client
            .search_points(SearchPointsBuilder::new(collection, query, limit).with_payload(true))
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        let mut results: Vec<SearchResult> = search_result
            .result
            .into_iter()
            .filter_map(SearchResult::from_scored_point)
            .collect();
        rank_results(&mut results);

        debug!(collection, hits = results.len(), "Qdrant search");
        Ok(results)
    }
}
