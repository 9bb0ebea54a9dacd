//! Typed model output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The validated result of a generation: a single field holding the dialect-specific
/// query text (an SQL statement or a JSON query document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuery {
    pub generated_sql: String,
}

impl GeneratedQuery {
    pub fn new(generated_sql: impl Into<String>) -> Self {
        Self {
            generated_sql: generated_sql.into(),
        }
    }

    pub fn into_text(self) -> String {
        self.generated_sql
    }
}

/// Parses the model's raw output into a [`GeneratedQuery`].
///
/// Accepts a bare JSON object or one wrapped in markdown code fences. A non-string
/// `generated_sql` value (MongoDB answers are sometimes inlined as objects) is
/// re-serialized as compact JSON. Returns a human-readable error detail on failure,
/// which is fed back to the model on reask.
pub fn parse_envelope(raw: &str) -> Result<GeneratedQuery, String> {
    let body = strip_code_fences(raw);
    if body.is_empty() {
        return Err("response was empty; expected a JSON object".to_string());
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| format!("response is not valid JSON: {}", e))?;

    let object = value
        .as_object()
        .ok_or_else(|| "response must be a JSON object".to_string())?;

    let field = object
        .get("generated_sql")
        .ok_or_else(|| "missing required field `generated_sql`".to_string())?;

    let text = match field {
        Value::String(s) => s.trim().to_string(),
        Value::Object(_) | Value::Array(_) => field.to_string(),
        Value::Null => return Err("field `generated_sql` must not be null".to_string()),
        other => {
            return Err(format!(
                "field `generated_sql` must be a string, got `{}`",
                other
            ));
        }
    };

    if text.is_empty() {
        return Err("field `generated_sql` must not be empty".to_string());
    }

    Ok(GeneratedQuery::new(text))
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the optional language tag on the opening fence.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };

    rest.strip_suffix("```").unwrap_or(rest).trim()
}
