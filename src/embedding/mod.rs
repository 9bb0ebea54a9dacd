//! Text embeddings for the semantic cache.
//!
//! [`TextEmbedder`] talks to an OpenAI-compatible `/embeddings` endpoint, or runs a
//! deterministic stub (see [`EmbedderConfig::stub`]) for tests and offline use.

mod config;
mod error;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL, EmbedderConfig};
pub use error::EmbeddingError;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

enum EmbedderBackend {
    Http {
        client: reqwest::Client,
        url: String,
        api_key: Option<String>,
    },
    Stub,
}

/// Embedding generator used by the semantic cache.
pub struct TextEmbedder {
    backend: EmbedderBackend,
    config: EmbedderConfig,
}

impl std::fmt::Debug for TextEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Http { url, .. } => format!("Http({})", url),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("model", &self.config.model)
            .field("embedding_dim", &self.config.embedding_dim)
            .finish()
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl TextEmbedder {
    /// Builds an embedder from config.
    pub fn load(config: EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(endpoint) = config.endpoint.clone() else {
            warn!("Embedder running in STUB mode (hashed bag-of-words)");
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        };

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let url = format!("{}/embeddings", endpoint.trim_end_matches('/'));
        debug!(url = %url, model = %config.model, "HTTP embedder configured");

        Ok(Self {
            backend: EmbedderBackend::Http {
                client,
                url,
                api_key: config.api_key.clone(),
            },
            config,
        })
    }

    /// Shorthand for a stub embedder with the given dimension.
    pub fn stub(embedding_dim: usize) -> Result<Self, EmbeddingError> {
        Self::load(EmbedderConfig::stub().embedding_dim(embedding_dim))
    }

    pub fn dimension(&self) -> usize {
        self.config.embedding_dim
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }

    /// Embeds `text` into a vector of [`dimension`](Self::dimension) floats.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EmbedderBackend::Http {
                client,
                url,
                api_key,
            } => self.embed_http(client, url, api_key.as_deref(), text).await,
            EmbedderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    async fn embed_http(
        &self,
        client: &reqwest::Client,
        url: &str,
        api_key: Option<&str>,
        text: &str,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let mut request = client.post(url).json(&EmbeddingRequest {
            model: &self.config.model,
            input: text,
        });
        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::RequestFailed {
                reason: format!("HTTP {}: {}", status, body),
            });
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse {
                reason: "response contained no embeddings".to_string(),
            })?;

        if embedding.len() != self.config.embedding_dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.embedding_dim,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }

    /// Signed feature hashing over lowercase word tokens, L2-normalized.
    /// Texts sharing most of their words land close together.
    fn embed_stub(&self, text: &str) -> Vec<f32> {
        let dim = self.config.embedding_dim;
        let mut embedding = vec![0.0f32; dim];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            let hash = blake3::hash(token.as_bytes());
            let bytes = hash.as_bytes();
            let bucket = u64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]) as usize
                % dim;
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        normalize(&mut embedding);
        embedding
    }
}

fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
