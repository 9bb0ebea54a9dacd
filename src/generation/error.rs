use thiserror::Error;

/// Errors returned by the validated generator.
///
/// The three variants are distinct outcomes the caller must be able to tell apart:
/// a rejected input is permanent, exhausted validation is a failed request, and an
/// unavailable backend is an infrastructure problem.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The input-safety validator rejected the prompt. Never retried.
    #[error("input rejected by safety screen: {detail}")]
    UnsafeInput {
        /// Validator detail, surfaced verbatim.
        detail: String,
    },

    /// Every attempt produced output that failed structural validation.
    #[error("generated output failed validation after {attempts} attempt(s): {detail}")]
    ValidationExhausted {
        /// Number of backend calls made.
        attempts: u32,
        /// Detail from the final failed attempt.
        detail: String,
    },

    /// The completion backend failed (network, provider error or timeout).
    #[error("generation backend unavailable: {message}")]
    BackendUnavailable {
        /// Underlying cause.
        message: String,
    },
}

impl GenerationError {
    pub fn backend(message: impl Into<String>) -> Self {
        GenerationError::BackendUnavailable {
            message: message.into(),
        }
    }
}

/// Convenience result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
