//! sqlgen library crate (used by the server and integration tests).
//!
//! Translates natural-language questions into validated PostgreSQL or MongoDB queries,
//! answering repeated or similar questions from a cache instead of the model.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`QueryPipeline`], [`ResourceRegistry`] - Cache-or-generate flow and its store handles
//! - [`Answer`], [`AnswerSource`], [`PipelineError`], [`ErrorKind`] - Results and failures
//!
//! ## Caches
//! - [`ExactMatchCache`], [`SemanticCache`] - Dialect-scoped response caches
//! - [`CacheStrategy`], [`CacheNamespace`] - Strategy selection and key spaces
//!
//! ## Generation
//! - [`ValidatedGenerator`], [`CompletionBackend`] - Screened, validated generation with reask
//! - [`OutputSchema`], [`Dialect`] - Per-dialect prompt and validators
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod embedding;
pub mod gateway;
pub mod generation;
pub mod hashing;
pub mod kvstore;
pub mod pipeline;
pub mod schema;
pub mod validation;
pub mod vectordb;

pub use cache::{
    CacheError, CacheHit, CacheMetadata, CacheNamespace, CacheStrategy, DEFAULT_DISTANCE_THRESHOLD,
    ExactMatchCache, SemanticCache,
};
pub use config::{Config, ConfigError};
pub use embedding::{EmbedderConfig, EmbeddingError, TextEmbedder};
pub use generation::{
    CompletionBackend, GenaiBackend, GenerationError, GeneratorConfig, ModelOptions,
    ValidatedGenerator,
};
#[cfg(any(test, feature = "mock"))]
pub use generation::MockCompletionBackend;
pub use hashing::{entry_id, hash_query, query_fingerprint};
#[cfg(any(test, feature = "mock"))]
pub use kvstore::MemoryKvStore;
pub use kvstore::{KeyValueStore, KvStoreError, RedisKvStore};
#[cfg(any(test, feature = "mock"))]
pub use pipeline::MockQueryPipeline;
pub use pipeline::{
    Answer, AnswerSource, ErrorKind, PipelineError, QueryPipeline, RegistryError, ResourceRegistry,
};
pub use schema::{Dialect, GeneratedQuery, OutputSchema};
pub use validation::{SafetyValidator, StructuralValidator, ValidationOutcome};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorStore;
pub use vectordb::{QdrantVectorStore, SearchResult, VectorDbError, VectorPoint, VectorStore};
