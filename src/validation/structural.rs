//! Structural validators applied to generated query text.

use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use super::ValidationOutcome;

/// Accepts text that parses as one or more PostgreSQL statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlSyntaxValidator;

impl SqlSyntaxValidator {
    pub fn validate(&self, text: &str) -> ValidationOutcome {
        let dialect = PostgreSqlDialect {};
        match Parser::parse_sql(&dialect, text) {
            Ok(statements) if statements.is_empty() => {
                ValidationOutcome::fail("no SQL statement found")
            }
            Ok(_) => ValidationOutcome::Pass,
            Err(e) => ValidationOutcome::fail(format!("invalid PostgreSQL syntax: {}", e)),
        }
    }
}

/// Accepts text that parses as a JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSyntaxValidator;

impl JsonSyntaxValidator {
    pub fn validate(&self, text: &str) -> ValidationOutcome {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(_) => ValidationOutcome::Pass,
            Err(e) => ValidationOutcome::fail(format!("invalid JSON: {}", e)),
        }
    }
}

/// Structural validator selected by dialect.
#[derive(Debug, Clone, Copy)]
pub enum StructuralValidator {
    Sql(SqlSyntaxValidator),
    Json(JsonSyntaxValidator),
}

impl StructuralValidator {
    pub fn validate(&self, text: &str) -> ValidationOutcome {
        match self {
            StructuralValidator::Sql(v) => v.validate(text),
            StructuralValidator::Json(v) => v.validate(text),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StructuralValidator::Sql(_) => "valid_sql",
            StructuralValidator::Json(_) => "valid_json",
        }
    }
}
