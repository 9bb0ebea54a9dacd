use std::time::Duration;

use super::error::EmbeddingError;

/// Default embedding dimension (OpenAI `text-embedding-3-small`).
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;
/// Default embedding model identifier.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

#[derive(Debug, Clone)]
/// Configuration for [`TextEmbedder`](super::TextEmbedder).
pub struct EmbedderConfig {
    /// Base URL of an OpenAI-compatible API (e.g. `https://api.openai.com/v1`).
    /// `None` selects the stub embedder.
    pub endpoint: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub embedding_dim: usize,
    pub timeout: Duration,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            timeout: Duration::from_secs(10),
        }
    }
}

impl EmbedderConfig {
    /// Config for the deterministic stub embedder.
    pub fn stub() -> Self {
        Self::default()
    }

    pub fn http(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_stub(&self) -> bool {
        self.endpoint.is_none()
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be > 0".to_string(),
            });
        }
        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(EmbeddingError::InvalidConfig {
                    reason: format!("endpoint must be an http(s) URL: {}", endpoint),
                });
            }
            if self.model.trim().is_empty() {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "model must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}
