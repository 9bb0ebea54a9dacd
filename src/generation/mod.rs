//! Schema-validated query generation.
//!
//! [`ValidatedGenerator`] screens the input, calls a [`CompletionBackend`], validates the
//! output against an [`OutputSchema`](crate::schema::OutputSchema) and reasks on failure.

pub mod backend;
pub mod error;
pub mod generator;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod options;

#[cfg(test)]
mod tests;

pub use backend::{CompletionBackend, GenaiBackend};
pub use error::{GenerationError, GenerationResult};
pub use generator::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT, GenerationAttempt, GeneratorConfig,
    StepOutcome, ValidatedGenerator,
};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCompletionBackend, MockReply, envelope};
pub use options::{DEFAULT_MODEL, ModelOptions, ModelParam};
