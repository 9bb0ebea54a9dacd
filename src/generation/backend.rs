use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::{debug, error};

use super::error::{GenerationError, GenerationResult};
use super::options::{ModelOptions, ModelParam};

/// The raw text-completion function consumed by the generator.
///
/// Each call is assumed to be billed; implementations must not retry internally.
pub trait CompletionBackend: Send + Sync {
    /// Sends `prompt` to the model and returns its raw text output.
    fn complete(
        &self,
        prompt: &str,
        options: &ModelOptions,
    ) -> impl std::future::Future<Output = GenerationResult<String>> + Send;
}

/// [`CompletionBackend`] backed by a [`genai::Client`].
///
/// Provider credentials are resolved by genai from the environment (e.g. `OPENAI_API_KEY`).
#[derive(Clone, Default)]
pub struct GenaiBackend {
    client: Client,
}

impl std::fmt::Debug for GenaiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiBackend").finish_non_exhaustive()
    }
}

impl GenaiBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn chat_options(options: &ModelOptions) -> ChatOptions {
        options
            .params()
            .iter()
            .fold(ChatOptions::default(), |acc, param| match *param {
                ModelParam::Temperature(t) => acc.with_temperature(t),
                ModelParam::MaxTokens(n) => acc.with_max_tokens(n),
                ModelParam::TopP(p) => acc.with_top_p(p),
            })
    }
}

impl CompletionBackend for GenaiBackend {
    async fn complete(&self, prompt: &str, options: &ModelOptions) -> GenerationResult<String> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt.to_string())]);
        let chat_options = Self::chat_options(options);

        debug!(model = %options.model, prompt_len = prompt.len(), "Calling completion backend");

        let response = self
            .client
            .exec_chat(&options.model, request, Some(&chat_options))
            .await
            .map_err(|e| {
                error!(model = %options.model, "Provider error: {}", e);
                GenerationError::backend(e.to_string())
            })?;

        Ok(response.first_text().unwrap_or_default().to_string())
    }
}
