//! Test fixtures for integration tests.

use std::sync::Arc;

use sqlgen::generation::{GeneratorConfig, MockCompletionBackend};
use sqlgen::kvstore::MemoryKvStore;
use sqlgen::pipeline::{MOCK_EMBEDDING_DIM, MockQueryPipeline, QueryPipeline, ResourceRegistry};
use sqlgen::validation::SafetyValidator;
use sqlgen::vectordb::MockVectorStore;
use sqlgen::{DEFAULT_DISTANCE_THRESHOLD, TextEmbedder, ValidatedGenerator};

pub const USERS_QUERY: &str = "list all users older than 30";
pub const USERS_SQL: &str = "SELECT * FROM users WHERE age > 30";
pub const USERS_MONGO: &str = r#"{"collection": "users", "filter": {"age": {"$gt": 30}}}"#;

/// A mock pipeline plus handles on every store it writes to.
pub struct TestPipeline {
    pub pipeline: Arc<MockQueryPipeline>,
    pub kv: MemoryKvStore,
    pub vectors: MockVectorStore,
    pub backend: MockCompletionBackend,
}

pub struct PipelineBuilder {
    backend: MockCompletionBackend,
    max_attempts: u32,
    threshold: f32,
    safety: SafetyValidator,
}

impl PipelineBuilder {
    pub fn new(backend: MockCompletionBackend) -> Self {
        Self {
            backend,
            max_attempts: 3,
            threshold: DEFAULT_DISTANCE_THRESHOLD,
            safety: SafetyValidator::heuristic(),
        }
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn safety(mut self, safety: SafetyValidator) -> Self {
        self.safety = safety;
        self
    }

    pub async fn build(self) -> TestPipeline {
        let kv = MemoryKvStore::new();
        let vectors = MockVectorStore::new();
        let embedder = Arc::new(TextEmbedder::stub(MOCK_EMBEDDING_DIM).unwrap());

        let registry = ResourceRegistry::new_mock(&kv, &vectors, embedder, self.threshold, self.safety)
            .await
            .unwrap();
        let generator = ValidatedGenerator::new(
            self.backend.clone(),
            GeneratorConfig::default().max_attempts(self.max_attempts),
        );

        TestPipeline {
            pipeline: Arc::new(QueryPipeline::new(Arc::new(registry), generator)),
            kv,
            vectors,
            backend: self.backend,
        }
    }
}
