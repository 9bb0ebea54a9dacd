//! Validated generation with bounded reask.
//!
//! Per call: `Screening → Generating → Validating → {Accepted | Retrying → Generating | Rejected}`.
//! Screening is a single-shot gate. Every pass through `Generating` is one backend call,
//! and the number of those calls never exceeds [`GeneratorConfig::max_attempts`].

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::backend::CompletionBackend;
use super::error::{GenerationError, GenerationResult};
use super::options::ModelOptions;
use crate::schema::{GeneratedQuery, OutputSchema, parse_envelope, reask_prompt};
use crate::validation::ValidationOutcome;

/// Default total number of generation attempts (one initial call plus two reasks).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default per-call backend timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
/// Configuration for [`ValidatedGenerator`].
pub struct GeneratorConfig {
    /// Total backend calls allowed per `generate` (must be >= 1).
    pub max_attempts: u32,
    /// Timeout applied to every backend call, including the safety judgement.
    pub request_timeout: Duration,
    /// Options forwarded to the backend untouched.
    pub options: ModelOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            options: ModelOptions::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }
}

/// Outcome of one step of the generation state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<T> {
    Accept(T),
    Retry(String),
    Fatal(String),
}

/// One backend call and its validation result. Never persisted.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    attempt: u32,
    raw_output: String,
    outcome: ValidationOutcome,
    parsed: Option<GeneratedQuery>,
}

impl GenerationAttempt {
    /// Parses and structurally validates `raw_output` against `schema`.
    pub fn evaluate(attempt: u32, raw_output: String, schema: &OutputSchema) -> Self {
        let (outcome, parsed) = match parse_envelope(&raw_output) {
            Err(detail) => (ValidationOutcome::Fail(detail), None),
            Ok(parsed) => match schema.structural().validate(&parsed.generated_sql) {
                ValidationOutcome::Pass => (ValidationOutcome::Pass, Some(parsed)),
                ValidationOutcome::Fail(detail) => (
                    ValidationOutcome::Fail(format!("{}: {}", schema.structural().name(), detail)),
                    None,
                ),
            },
        };

        Self {
            attempt,
            raw_output,
            outcome,
            parsed,
        }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn raw_output(&self) -> &str {
        &self.raw_output
    }

    pub fn outcome(&self) -> &ValidationOutcome {
        &self.outcome
    }

    /// Structural failures are retryable; only screening produces `Fatal`.
    pub fn into_step(self) -> StepOutcome<GeneratedQuery> {
        match (self.outcome, self.parsed) {
            (ValidationOutcome::Pass, Some(parsed)) => StepOutcome::Accept(parsed),
            (ValidationOutcome::Fail(detail), _) => StepOutcome::Retry(detail),
            (ValidationOutcome::Pass, None) => {
                StepOutcome::Retry("validated output was not retained".to_string())
            }
        }
    }
}

/// Wraps a [`CompletionBackend`] with input screening, output validation and reask.
pub struct ValidatedGenerator<C: CompletionBackend> {
    backend: C,
    config: GeneratorConfig,
}

impl<C: CompletionBackend> std::fmt::Debug for ValidatedGenerator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatedGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<C: CompletionBackend> ValidatedGenerator<C> {
    pub fn new(backend: C, mut config: GeneratorConfig) -> Self {
        config.max_attempts = config.max_attempts.max(1);
        Self { backend, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn backend(&self) -> &C {
        &self.backend
    }

    /// Produces a schema-conformant query for `query`.
    #[instrument(skip(self, query, schema), fields(dialect = %schema.dialect(), query_len = query.len()))]
    pub async fn generate(
        &self,
        query: &str,
        schema: &OutputSchema,
    ) -> GenerationResult<GeneratedQuery> {
        if let StepOutcome::Fatal(detail) = self.screen(query, schema).await? {
            warn!(validator = schema.safety().name(), "Input rejected by safety screen");
            return Err(GenerationError::UnsafeInput { detail });
        }

        let base_prompt = schema.render_prompt(query);
        let mut prompt = base_prompt.clone();
        let mut last_detail = String::new();

        for attempt in 1..=self.config.max_attempts {
            debug!(attempt, "Generating");
            let raw_output = self
                .with_timeout(self.backend.complete(&prompt, &self.config.options))
                .await?;

            let evaluated = GenerationAttempt::evaluate(attempt, raw_output, schema);
            let raw_output = evaluated.raw_output().to_string();

            match evaluated.into_step() {
                StepOutcome::Accept(parsed) => {
                    info!(attempt, "Generated output accepted");
                    return Ok(parsed);
                }
                StepOutcome::Retry(detail) => {
                    warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        detail = %detail,
                        "Generated output failed validation"
                    );
                    prompt = reask_prompt(&base_prompt, &raw_output, &detail);
                    last_detail = detail;
                }
                StepOutcome::Fatal(detail) => {
                    return Err(GenerationError::ValidationExhausted {
                        attempts: attempt,
                        detail,
                    });
                }
            }
        }

        Err(GenerationError::ValidationExhausted {
            attempts: self.config.max_attempts,
            detail: last_detail,
        })
    }

    async fn screen(&self, query: &str, schema: &OutputSchema) -> GenerationResult<StepOutcome<()>> {
        debug!(validator = schema.safety().name(), "Screening input");
        let outcome = self
            .with_timeout(schema.safety().screen(query, &self.backend, &self.config.options))
            .await?;

        Ok(match outcome {
            ValidationOutcome::Pass => StepOutcome::Accept(()),
            ValidationOutcome::Fail(detail) => StepOutcome::Fatal(detail),
        })
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = GenerationResult<T>>,
    ) -> GenerationResult<T> {
        tokio::time::timeout(self.config.request_timeout, fut)
            .await
            .map_err(|_| {
                GenerationError::backend(format!(
                    "request timed out after {}s",
                    self.config.request_timeout.as_secs_f64()
                ))
            })?
    }
}
