use thiserror::Error;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::embedding::EmbeddingError;
use crate::generation::GenerationError;

/// Stable, caller-facing error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    UnsafeInput,
    ValidationExhausted,
    BackendUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::UnsafeInput => "unsafe_input",
            ErrorKind::ValidationExhausted => "validation_exhausted",
            ErrorKind::BackendUnavailable => "backend_unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`QueryPipeline::answer`](super::QueryPipeline::answer).
///
/// No variant ever carries a partial answer.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// Surfaced verbatim from the safety screen.
    #[error("{detail}")]
    UnsafeInput { detail: String },

    #[error("could not produce a valid query after {attempts} attempt(s): {detail}")]
    ValidationExhausted { attempts: u32, detail: String },

    /// Generation backend or cache store failure.
    #[error("backend unavailable: {message}")]
    BackendUnavailable { message: String },
}

impl PipelineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PipelineError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            PipelineError::UnsafeInput { .. } => ErrorKind::UnsafeInput,
            PipelineError::ValidationExhausted { .. } => ErrorKind::ValidationExhausted,
            PipelineError::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
        }
    }
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::UnsafeInput { detail } => PipelineError::UnsafeInput { detail },
            GenerationError::ValidationExhausted { attempts, detail } => {
                PipelineError::ValidationExhausted { attempts, detail }
            }
            GenerationError::BackendUnavailable { message } => {
                PipelineError::BackendUnavailable { message }
            }
        }
    }
}

impl From<CacheError> for PipelineError {
    fn from(err: CacheError) -> Self {
        if err.is_backend() {
            PipelineError::BackendUnavailable {
                message: err.to_string(),
            }
        } else {
            PipelineError::InvalidRequest {
                message: err.to_string(),
            }
        }
    }
}

/// Errors raised while building the [`ResourceRegistry`](super::ResourceRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}
