use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::Dialect;

/// Which cache a request consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    /// Hit iff the query text is byte-identical to a stored key.
    #[serde(alias = "exact_match", alias = "exact-match")]
    Exact,
    /// Hit iff the embedding distance is within the threshold.
    Semantic,
}

impl CacheStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStrategy::Exact => "exact",
            CacheStrategy::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" | "exact_match" | "exact-match" => Ok(CacheStrategy::Exact),
            "semantic" => Ok(CacheStrategy::Semantic),
            other => Err(format!("unknown cache strategy '{}'", other)),
        }
    }
}

/// Stored alongside every cached response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Unix timestamp in milliseconds.
    pub generated_at: i64,
    pub dialect: Dialect,
    pub strategy: CacheStrategy,
}

impl CacheMetadata {
    /// Metadata stamped with the current time.
    pub fn now(dialect: Dialect, strategy: CacheStrategy) -> Self {
        Self {
            generated_at: chrono::Utc::now().timestamp_millis(),
            dialect,
            strategy,
        }
    }
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit {
    pub response: String,
    pub metadata: CacheMetadata,
    /// Cosine distance of the match; `None` for exact hits.
    pub distance: Option<f32>,
}

/// Serialized form of an exact-match value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ExactEntry {
    pub response: String,
    pub metadata: CacheMetadata,
}
