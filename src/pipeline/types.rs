use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Cache,
    Generated,
}

impl AnswerSource {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Cache => "cache",
            AnswerSource::Generated => "generated",
        }
    }
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`QueryPipeline::answer`](super::QueryPipeline::answer).
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    /// Wall-clock time from call start to answer ready.
    pub elapsed: Duration,
    pub source: AnswerSource,
    /// Match distance for semantic cache hits.
    pub distance: Option<f32>,
}

impl Answer {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Elapsed time with two decimals, e.g. `"0.42"`.
    pub fn elapsed_display(&self) -> String {
        format!("{:.2}", self.elapsed_seconds())
    }

    pub fn is_cached(&self) -> bool {
        self.source == AnswerSource::Cache
    }
}
