//! Output and input validators.
//!
//! - [`structural`] checks generated text parses as SQL or JSON.
//! - [`safety`] screens the incoming request before any generation attempt.

pub mod safety;
pub mod structural;

pub use safety::{DEFAULT_BLOCKED_PHRASES, HeuristicScreen, LlmJudgeScreen, SafetyValidator};
pub use structural::{JsonSyntaxValidator, SqlSyntaxValidator, StructuralValidator};

/// Result of running a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Pass,
    Fail(String),
}

impl ValidationOutcome {
    pub fn fail(detail: impl Into<String>) -> Self {
        ValidationOutcome::Fail(detail.into())
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationOutcome::Pass)
    }

    /// Returns the failure detail, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Pass => None,
            ValidationOutcome::Fail(detail) => Some(detail),
        }
    }
}
