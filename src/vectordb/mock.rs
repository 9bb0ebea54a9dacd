use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::vectordb::{
    SearchResult, VectorDbError, VectorPoint, VectorStore, WriteConsistency, rank_results,
};

#[derive(Default)]
struct MockCollection {
    vector_size: u64,
    points: HashMap<u64, VectorPoint>,
}

#[derive(Default)]
struct Shared {
    collections: RwLock<HashMap<String, MockCollection>>,
    unavailable: AtomicBool,
}

/// In-memory vector store with exact cosine search. Clones share data.
#[derive(Clone, Default)]
pub struct MockVectorStore {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for MockVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockVectorStore")
            .field("collections", &self.shared.collections.read().len())
            .finish()
    }
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.shared
            .collections
            .read()
            .get(collection)
            .map(|c| c.points.len())
    }

    /// Makes every operation fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn is_unavailable(&self) -> bool {
        self.shared.unavailable.load(Ordering::SeqCst)
    }
}

impl VectorStore for MockVectorStore {
    async fn is_ready(&self) -> bool {
        !self.is_unavailable()
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        if self.is_unavailable() {
            return Err(VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: "mock store marked unavailable".to_string(),
            });
        }

        self.shared
            .collections
            .write()
            .entry(name.to_string())
            .or_insert_with(|| MockCollection {
                vector_size,
                points: HashMap::new(),
            });

        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        point: VectorPoint,
        _consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        if self.is_unavailable() {
            return Err(VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: "mock store marked unavailable".to_string(),
            });
        }

        let mut collections = self.shared.collections.write();
        let coll =
            collections
                .get_mut(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        if point.vector.len() as u64 != coll.vector_size {
            return Err(VectorDbError::InvalidDimension {
                expected: coll.vector_size as usize,
                actual: point.vector.len(),
            });
        }

        coll.points.insert(point.id, point);
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchResult>, VectorDbError> {
        if self.is_unavailable() {
            return Err(VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "mock store marked unavailable".to_string(),
            });
        }

        let collections = self.shared.collections.read();
        let coll = collections
            .get(collection)
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            })?;

        let mut results: Vec<SearchResult> = coll
            .points
            .values()
            .map(|p| SearchResult {
                id: p.id,
                score: cosine_similarity(&query, &p.vector),
                prompt: p.prompt.clone(),
                response: p.response.clone(),
                dialect: p.dialect.clone(),
                generated_at: p.generated_at,
            })
            .collect();

        rank_results(&mut results);
        results.truncate(limit as usize);
        Ok(results)
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
