//! Prompt templates.
//!
//! Templates are data: rendering is literal placeholder substitution and nothing else.

/// Placeholder replaced by the user's query text.
pub const QUERY_PLACEHOLDER: &str = "${query}";
/// Placeholder replaced by [`OUTPUT_FORMAT_SUFFIX`].
pub const OUTPUT_FORMAT_PLACEHOLDER: &str = "${output_format}";

pub const PROMPT_SQL_POSTGRESQL: &str = r#"
Consider a free-form text query for a database.
Your task is to convert the free-form text prompt into an SQL query suitable for
use with the PostgreSQL database system.

Approach the task in a step-by-step basis. Take your time and do not skip any steps:
0. Do not write anything just yet.
1. Read the entirety of the query, making explicit note of the key nouns.
2. Consider what conditions have been requested.
3. Consider what aggregations (if any) have been requested.

Query: ${query}

Only generate SQL code and nothing else.

${output_format}
"#;

pub const PROMPT_NOSQL_MONGODB: &str = r#"
Consider a free-form text query for a database.
Your task is to convert the free-form text prompt into a JSON query suitable for
use with MongoDB.

Approach the task in a step-by-step basis. Take your time and do not skip any steps:
0. Do not write anything just yet.
1. Read the entirety of the query, making explicit note of the key nouns.
2. Consider what conditions have been requested.
3. Consider what aggregations (if any) have been requested.

Query: ${query}

Only generate JSON code and nothing else.

${output_format}
"#;

/// Instructions describing the JSON envelope the model must answer with.
pub const OUTPUT_FORMAT_SUFFIX: &str = r#"Given below is the JSON schema of the expected output:

{"type": "object", "properties": {"generated_sql": {"type": "string"}}, "required": ["generated_sql"]}

ONLY return a valid JSON object (no other text is necessary), where the key of the field
in JSON is `generated_sql` and its value is the generated query. Do not wrap the object
in markdown code fences."#;

/// A prompt template with `${query}` and `${output_format}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    source: &'static str,
}

impl PromptTemplate {
    pub const fn new(source: &'static str) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Renders the template for `query`.
    pub fn render(&self, query: &str) -> String {
        // Output format first so query text containing a placeholder is never expanded.
        self.source
            .replace(OUTPUT_FORMAT_PLACEHOLDER, OUTPUT_FORMAT_SUFFIX)
            .replace(QUERY_PLACEHOLDER, query)
    }
}

/// Builds the corrective prompt sent after a structural validation failure.
pub fn reask_prompt(original_prompt: &str, previous_output: &str, detail: &str) -> String {
    format!(
        "{original_prompt}\n\nI was given the following response, which failed validation:\n\n\
         {previous_output}\n\nThe following errors were found:\n{detail}\n\n\
         Help me correct this by returning a corrected response.\n\n{OUTPUT_FORMAT_SUFFIX}"
    )
}
