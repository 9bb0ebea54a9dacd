use std::cmp::Ordering;
use std::collections::HashMap;

use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;

pub(crate) const FIELD_PROMPT: &str = "prompt";
pub(crate) const FIELD_RESPONSE: &str = "response";
pub(crate) const FIELD_DIALECT: &str = "dialect";
pub(crate) const FIELD_GENERATED_AT: &str = "generated_at";

/// Distances below this are treated as identical vectors.
pub const DISTANCE_EPSILON: f32 = 1e-6;

/// A cached prompt/response pair plus its embedding.
#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub prompt: String,
    pub response: String,
    pub dialect: String,
    /// Unix timestamp in milliseconds.
    pub generated_at: i64,
}

impl VectorPoint {
    pub fn new(id: u64, vector: Vec<f32>, prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            id,
            vector,
            prompt: prompt.into(),
            response: response.into(),
            dialect: String::new(),
            generated_at: 0,
        }
    }

    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = dialect.into();
        self
    }

    pub fn with_generated_at(mut self, generated_at: i64) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub(crate) fn payload(&self) -> HashMap<String, qdrant_client::qdrant::Value> {
        let mut payload = HashMap::new();
        payload.insert(FIELD_PROMPT.to_string(), self.prompt.clone().into());
        payload.insert(FIELD_RESPONSE.to_string(), self.response.clone().into());
        payload.insert(FIELD_DIALECT.to_string(), self.dialect.clone().into());
        payload.insert(FIELD_GENERATED_AT.to_string(), self.generated_at.into());
        payload
    }
}

/// A search hit. `score` is cosine similarity in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub id: u64,
    pub score: f32,
    pub prompt: String,
    pub response: String,
    pub dialect: String,
    pub generated_at: i64,
}

impl SearchResult {
    /// Cosine distance, `1 - score`. Float noise below [`DISTANCE_EPSILON`] reads as `0`.
    pub fn distance(&self) -> f32 {
        let distance = 1.0 - self.score;
        if distance < DISTANCE_EPSILON {
            0.0
        } else {
            distance
        }
    }

    /// Returns `None` for non-numeric ids or points without a response.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n,
            _ => return None,
        };

        let payload = point.payload;
        let text = |field: &str| {
            payload
                .get(field)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        let response = text(FIELD_RESPONSE)?;

        Some(SearchResult {
            id,
            score: point.score,
            prompt: text(FIELD_PROMPT).unwrap_or_default(),
            response,
            dialect: text(FIELD_DIALECT).unwrap_or_default(),
            generated_at: payload
                .get(FIELD_GENERATED_AT)
                .and_then(|v| v.as_integer())
                .unwrap_or(0),
        })
    }
}

/// Orders results nearest first, then oldest first, then by id.
pub fn rank_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.generated_at.cmp(&b.generated_at))
            .then(a.id.cmp(&b.id))
    });
}
