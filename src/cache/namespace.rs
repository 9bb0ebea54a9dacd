use crate::schema::Dialect;

/// Prefix for semantic collection names.
pub const SEMANTIC_COLLECTION_PREFIX: &str = "sqlgen_semantic";
/// Sub-namespace for exact-match keys.
pub const EXACT_KEY_PREFIX: &str = "exact:";

/// Dialect-scoped location of cache entries.
///
/// Each dialect gets its own Redis database index and its own Qdrant collection, so an
/// entry written for one dialect can never be read back through another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheNamespace {
    dialect: Dialect,
}

impl CacheNamespace {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn db_index(&self) -> i64 {
        match self.dialect {
            Dialect::PostgreSql => 0,
            Dialect::MongoDb => 1,
        }
    }

    pub fn collection(&self) -> String {
        format!("{}_{}", SEMANTIC_COLLECTION_PREFIX, self.dialect.as_str())
    }

    /// Redis key for `query`. The query is embedded verbatim.
    pub fn exact_key(&self, query: &str) -> String {
        format!("{}{}", EXACT_KEY_PREFIX, query)
    }
}

impl From<Dialect> for CacheNamespace {
    fn from(dialect: Dialect) -> Self {
        Self::new(dialect)
    }
}
