//! The cache-or-generate query pipeline.
//!
//! `lookup → (miss) generate + validate → store → Answer { text, elapsed, source }`.

pub mod error;
pub mod query;
pub mod registry;
pub mod types;


pub use error::{ErrorKind, PipelineError, RegistryError};
#[cfg(any(test, feature = "mock"))]
pub use query::{MOCK_EMBEDDING_DIM, MockQueryPipeline};
pub use query::QueryPipeline;
pub use registry::{DialectResources, ResourceRegistry};
pub use types::{Answer, AnswerSource};
