//! Qdrant vector database integration.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;

#[cfg(test)]
mod tests;

pub use client::{QdrantVectorStore, VectorStore};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorStore, cosine_similarity};
pub use model::{DISTANCE_EPSILON, SearchResult, VectorPoint, rank_results};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteConsistency {
    /// Wait for the point to be indexed and searchable (`wait=true`).
    Strong,
    /// Return once the server acknowledges receipt (`wait=false`).
    Eventual,
}

impl From<WriteConsistency> for bool {
    fn from(c: WriteConsistency) -> bool {
        matches!(c, WriteConsistency::Strong)
    }
}
