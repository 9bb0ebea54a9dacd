use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::kvstore::KvStoreError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors returned by the exact-match and semantic caches.
pub enum CacheError {
    #[error("key-value store error: {0}")]
    Store(#[from] KvStoreError),

    #[error("vector database error: {0}")]
    VectorDb(#[from] VectorDbError),

    #[error("embedding generation failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Distance thresholds must lie in `[0, 1]`.
    #[error("invalid distance threshold {value}: must lie in [0, 1]")]
    InvalidThreshold { value: f32 },

    #[error("failed to encode cache entry: {reason}")]
    Encode { reason: String },
}

impl CacheError {
    /// `true` for failures reaching a backing store, as opposed to bad input.
    pub fn is_backend(&self) -> bool {
        !matches!(self, CacheError::InvalidThreshold { .. })
    }
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

pub(crate) fn check_threshold(value: f32) -> CacheResult<f32> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(CacheError::InvalidThreshold { value })
    }
}
