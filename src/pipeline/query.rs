use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use super::error::PipelineError;
use super::registry::{DialectResources, ResourceRegistry};
use super::types::{Answer, AnswerSource};
use crate::cache::{CacheHit, CacheMetadata, CacheStrategy};
use crate::generation::{CompletionBackend, ValidatedGenerator};
use crate::hashing::query_fingerprint;
use crate::kvstore::KeyValueStore;
use crate::schema::Dialect;
use crate::vectordb::VectorStore;

#[cfg(any(test, feature = "mock"))]
use crate::cache::{CacheResult, DEFAULT_DISTANCE_THRESHOLD};
#[cfg(any(test, feature = "mock"))]
use crate::embedding::TextEmbedder;
#[cfg(any(test, feature = "mock"))]
use crate::generation::{GeneratorConfig, MockCompletionBackend};
#[cfg(any(test, feature = "mock"))]
use crate::kvstore::MemoryKvStore;
#[cfg(any(test, feature = "mock"))]
use crate::validation::SafetyValidator;
#[cfg(any(test, feature = "mock"))]
use crate::vectordb::MockVectorStore;

/// Stub embedding dimension used by [`MockQueryPipeline::new_mock`].
#[cfg(any(test, feature = "mock"))]
pub const MOCK_EMBEDDING_DIM: usize = 256;

/// Cache-or-generate pipeline.
///
/// Each [`answer`](Self::answer) runs lookup, then (on a miss) generation, then store,
/// strictly in sequence. Concurrent calls share the registry without locking; the last
/// accepted write for a key wins.
pub struct QueryPipeline<K: KeyValueStore, V: VectorStore, C: CompletionBackend> {
    registry: Arc<ResourceRegistry<K, V>>,
    generator: ValidatedGenerator<C>,
}

/// Pipeline over in-memory stores and a scripted backend.
#[cfg(any(test, feature = "mock"))]
pub type MockQueryPipeline = QueryPipeline<MemoryKvStore, MockVectorStore, MockCompletionBackend>;

impl<K: KeyValueStore, V: VectorStore, C: CompletionBackend> std::fmt::Debug
    for QueryPipeline<K, V, C>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("registry", &self.registry)
            .field("generator", &self.generator)
            .finish()
    }
}

impl<K: KeyValueStore, V: VectorStore, C: CompletionBackend> QueryPipeline<K, V, C> {
    pub fn new(registry: Arc<ResourceRegistry<K, V>>, generator: ValidatedGenerator<C>) -> Self {
        Self {
            registry,
            generator,
        }
    }

    pub fn registry(&self) -> &ResourceRegistry<K, V> {
        &self.registry
    }

    pub fn generator(&self) -> &ValidatedGenerator<C> {
        &self.generator
    }

    /// `true` when every backing store answers.
    pub async fn is_ready(&self) -> bool {
        self.registry.is_ready().await
    }

    /// Answers `query` from the chosen cache, generating and storing on a miss.
    ///
    /// `threshold` overrides the semantic cache default for this call and is ignored by
    /// the exact-match strategy.
    #[instrument(
        skip(self, query),
        fields(dialect = %dialect, strategy = %strategy, query = %query_fingerprint(query))
    )]
    pub async fn answer(
        &self,
        query: &str,
        dialect: Dialect,
        strategy: CacheStrategy,
        threshold: Option<f32>,
    ) -> Result<Answer, PipelineError> {
        let started = Instant::now();

        if query.trim().is_empty() {
            return Err(PipelineError::invalid("query must not be empty"));
        }

        let resources = self.registry.dialect(dialect);

        if let Some(hit) = self.lookup(resources, query, strategy, threshold).await? {
            let answer = Answer {
                text: hit.response,
                elapsed: started.elapsed(),
                source: AnswerSource::Cache,
                distance: hit.distance,
            };
            info!(elapsed = %answer.elapsed_display(), distance = answer.distance, "Answered from cache");
            return Ok(answer);
        }

        let generated = self
            .generator
            .generate(query, &resources.schema)
            .await
            .inspect_err(|e| warn!(error = %e, "Generation failed, cache untouched"))?;
        let text = generated.into_text();

        let metadata = CacheMetadata::now(dialect, strategy);
        self.store(resources, query, &text, strategy, &metadata)
            .await?;

        let answer = Answer {
            text,
            elapsed: started.elapsed(),
            source: AnswerSource::Generated,
            distance: None,
        };
        info!(elapsed = %answer.elapsed_display(), "Answered by generation");
        Ok(answer)
    }

    async fn lookup(
        &self,
        resources: &DialectResources<K, V>,
        query: &str,
        strategy: CacheStrategy,
        threshold: Option<f32>,
    ) -> Result<Option<CacheHit>, PipelineError> {
        let hit = match strategy {
            CacheStrategy::Exact => {
                if threshold.is_some() {
                    debug!("Distance threshold ignored for exact-match lookup");
                }
                resources.exact.lookup(query).await
            }
            CacheStrategy::Semantic => resources.semantic.lookup(query, threshold).await,
        };

        hit.inspect_err(|e| warn!(error = %e, "Cache lookup failed"))
            .map_err(PipelineError::from)
    }

    async fn store(
        &self,
        resources: &DialectResources<K, V>,
        query: &str,
        response: &str,
        strategy: CacheStrategy,
        metadata: &CacheMetadata,
    ) -> Result<(), PipelineError> {
        let stored = match strategy {
            CacheStrategy::Exact => resources.exact.store(query, response, metadata).await,
            CacheStrategy::Semantic => resources
                .semantic
                .store(query, response, metadata)
                .await
                .map(|_| ()),
        };

        stored
            .inspect_err(|e| warn!(error = %e, "Cache store failed"))
            .map_err(PipelineError::from)
    }
}

#[cfg(any(test, feature = "mock"))]
impl MockQueryPipeline {
    /// Pipeline over fresh in-memory stores, a stub embedder and the heuristic screen.
    ///
    /// Store handles are reachable through [`registry`](Self::registry).
    pub async fn new_mock(backend: MockCompletionBackend, config: GeneratorConfig) -> CacheResult<Self> {
        let registry = ResourceRegistry::new_mock(
            &MemoryKvStore::new(),
            &MockVectorStore::new(),
            Arc::new(TextEmbedder::stub(MOCK_EMBEDDING_DIM)?),
            DEFAULT_DISTANCE_THRESHOLD,
            SafetyValidator::heuristic(),
        )
        .await?;

        Ok(Self::new(Arc::new(registry), ValidatedGenerator::new(backend, config)))
    }
}
