use std::sync::Arc;

use tracing::info;

use super::error::RegistryError;
use crate::cache::{CacheError, CacheNamespace, CacheResult, ExactMatchCache, SemanticCache};
use crate::config::Config;
use crate::embedding::TextEmbedder;
use crate::kvstore::redis_store::sanitize_url;
use crate::kvstore::{KeyValueStore, RedisKvStore};
use crate::schema::{Dialect, OutputSchema};
use crate::validation::SafetyValidator;
use crate::vectordb::{QdrantVectorStore, VectorStore};

#[cfg(any(test, feature = "mock"))]
use crate::kvstore::MemoryKvStore;
#[cfg(any(test, feature = "mock"))]
use crate::vectordb::MockVectorStore;

/// Everything needed to serve one dialect.
pub struct DialectResources<K: KeyValueStore, V: VectorStore> {
    pub schema: OutputSchema,
    pub exact: ExactMatchCache<K>,
    pub semantic: SemanticCache<V>,
}

impl<K: KeyValueStore, V: VectorStore> DialectResources<K, V> {
    pub async fn is_ready(&self) -> bool {
        self.exact.is_ready().await && self.semantic.is_ready().await
    }
}

/// Long-lived store handles and schemas, one set per dialect, built once at startup.
pub struct ResourceRegistry<K: KeyValueStore, V: VectorStore> {
    postgres: DialectResources<K, V>,
    mongodb: DialectResources<K, V>,
}

impl<K: KeyValueStore, V: VectorStore> std::fmt::Debug for ResourceRegistry<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("postgres", &self.postgres.semantic)
            .field("mongodb", &self.mongodb.semantic)
            .finish_non_exhaustive()
    }
}

impl<K: KeyValueStore, V: VectorStore> ResourceRegistry<K, V> {
    /// Builds a registry from per-dialect store handles.
    ///
    /// `exact_store` is called once per namespace and must return a handle bound to
    /// that namespace's database index.
    pub fn from_stores(
        mut exact_store: impl FnMut(CacheNamespace) -> K,
        semantic_store: V,
        embedder: Arc<TextEmbedder>,
        threshold: f32,
        safety: SafetyValidator,
    ) -> CacheResult<Self>
    where
        V: Clone,
    {
        let mut build = |dialect: Dialect| -> CacheResult<DialectResources<K, V>> {
            let namespace = CacheNamespace::new(dialect);
            Ok(DialectResources {
                schema: OutputSchema::for_dialect(dialect, safety.clone()),
                exact: ExactMatchCache::new(exact_store(namespace), namespace),
                semantic: SemanticCache::new(
                    semantic_store.clone(),
                    Arc::clone(&embedder),
                    namespace,
                    threshold,
                )?,
            })
        };

        Ok(Self {
            postgres: build(Dialect::PostgreSql)?,
            mongodb: build(Dialect::MongoDb)?,
        })
    }

    pub fn dialect(&self, dialect: Dialect) -> &DialectResources<K, V> {
        match dialect {
            Dialect::PostgreSql => &self.postgres,
            Dialect::MongoDb => &self.mongodb,
        }
    }

    pub fn schema(&self, dialect: Dialect) -> &OutputSchema {
        &self.dialect(dialect).schema
    }

    /// Creates every semantic collection that does not exist yet.
    pub async fn ensure_collections(&self) -> CacheResult<()> {
        for dialect in Dialect::ALL {
            self.dialect(dialect).semantic.ensure_collection().await?;
        }
        Ok(())
    }

    /// `true` when every store answers.
    pub async fn is_ready(&self) -> bool {
        self.postgres.is_ready().await && self.mongodb.is_ready().await
    }
}

impl ResourceRegistry<RedisKvStore, QdrantVectorStore> {
    /// Connects to Redis and Qdrant as configured and ensures the semantic collections.
    pub async fn connect(
        config: &Config,
        embedder: Arc<TextEmbedder>,
    ) -> Result<Self, RegistryError> {
        let safety = config.safety_validator()?;
        let postgres = RedisKvStore::connect(
            &config.redis_url,
            CacheNamespace::new(Dialect::PostgreSql).db_index(),
        )
        .await
        .map_err(CacheError::from)?;
        let mongodb = RedisKvStore::connect(
            &config.redis_url,
            CacheNamespace::new(Dialect::MongoDb).db_index(),
        )
        .await
        .map_err(CacheError::from)?;
        let qdrant = QdrantVectorStore::new(&config.qdrant_url)
            .map_err(CacheError::from)?;

        let registry = Self::from_stores(
            |namespace| match namespace.dialect() {
                Dialect::PostgreSql => postgres.clone(),
                Dialect::MongoDb => mongodb.clone(),
            },
            qdrant,
            embedder,
            config.distance_threshold,
            safety,
        )?;
        registry.ensure_collections().await?;

        info!(
            redis = %sanitize_url(&config.redis_url),
            qdrant = %config.qdrant_url,
            safety = registry.postgres.schema.safety().name(),
            "Resource registry ready"
        );
        Ok(registry)
    }
}

#[cfg(any(test, feature = "mock"))]
impl ResourceRegistry<MemoryKvStore, MockVectorStore> {
    /// In-memory registry over shared mock stores. Keep clones of `kv` and `vectors`
    /// to inspect or fail the stores from a test.
    pub async fn new_mock(
        kv: &MemoryKvStore,
        vectors: &MockVectorStore,
        embedder: Arc<TextEmbedder>,
        threshold: f32,
        safety: SafetyValidator,
    ) -> CacheResult<Self> {
        let registry = Self::from_stores(
            |namespace| kv.with_db(namespace.db_index()),
            vectors.clone(),
            embedder,
            threshold,
            safety,
        )?;
        registry.ensure_collections().await?;
        Ok(registry)
    }
}
