//! Output dialects and their schemas.
//!
//! An [`OutputSchema`] bundles everything dialect-specific: the prompt template, the
//! structural validator for the model's output, and the safety validator for the input.

pub mod output;
pub mod prompt;

pub use output::{GeneratedQuery, parse_envelope};
pub use prompt::{PROMPT_NOSQL_MONGODB, PROMPT_SQL_POSTGRESQL, PromptTemplate, reask_prompt};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::{JsonSyntaxValidator, SafetyValidator, SqlSyntaxValidator, StructuralValidator};

/// Target output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[serde(alias = "PostgreSQL", alias = "postgres")]
    PostgreSql,
    #[serde(alias = "MongoDB", alias = "mongo")]
    MongoDb,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::PostgreSql, Dialect::MongoDb];

    /// Stable lowercase identifier used in namespaces and the HTTP API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::PostgreSql => "postgresql",
            Dialect::MongoDb => "mongodb",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::PostgreSql => "PostgreSQL",
            Dialect::MongoDb => "MongoDB",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSql),
            "mongodb" | "mongo" => Ok(Dialect::MongoDb),
            other => Err(format!("unsupported dialect: {}", other)),
        }
    }
}

/// Everything the generator needs to produce output for one dialect.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    dialect: Dialect,
    template: PromptTemplate,
    structural: StructuralValidator,
    safety: SafetyValidator,
}

impl OutputSchema {
    /// Builds the schema for `dialect` with the given input-safety validator.
    pub fn for_dialect(dialect: Dialect, safety: SafetyValidator) -> Self {
        let (template, structural) = match dialect {
            Dialect::PostgreSql => (
                PromptTemplate::new(PROMPT_SQL_POSTGRESQL),
                StructuralValidator::Sql(SqlSyntaxValidator),
            ),
            Dialect::MongoDb => (
                PromptTemplate::new(PROMPT_NOSQL_MONGODB),
                StructuralValidator::Json(JsonSyntaxValidator),
            ),
        };

        Self {
            dialect,
            template,
            structural,
            safety,
        }
    }

    pub fn postgres(safety: SafetyValidator) -> Self {
        Self::for_dialect(Dialect::PostgreSql, safety)
    }

    pub fn mongodb(safety: SafetyValidator) -> Self {
        Self::for_dialect(Dialect::MongoDb, safety)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn structural(&self) -> &StructuralValidator {
        &self.structural
    }

    pub fn safety(&self) -> &SafetyValidator {
        &self.safety
    }

    pub fn render_prompt(&self, query: &str) -> String {
        self.template.render(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parsing() {
        assert_eq!("PostgreSQL".parse::<Dialect>(), Ok(Dialect::PostgreSql));
        assert_eq!("postgres".parse::<Dialect>(), Ok(Dialect::PostgreSql));
        assert_eq!(" MongoDB ".parse::<Dialect>(), Ok(Dialect::MongoDb));
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_dialect_serde() {
        let d: Dialect = serde_json::from_str(r#""mongodb""#).unwrap();
        assert_eq!(d, Dialect::MongoDb);

        let d: Dialect = serde_json::from_str(r#""PostgreSQL""#).unwrap();
        assert_eq!(d, Dialect::PostgreSql);

        assert_eq!(serde_json::to_string(&Dialect::PostgreSql).unwrap(), r#""postgresql""#);
    }

    #[test]
    fn test_schema_selects_validator_by_dialect() {
        let pg = OutputSchema::postgres(SafetyValidator::heuristic());
        let mongo = OutputSchema::mongodb(SafetyValidator::heuristic());

        assert!(matches!(pg.structural(), StructuralValidator::Sql(_)));
        assert!(matches!(mongo.structural(), StructuralValidator::Json(_)));
        assert_eq!(pg.template().source(), PROMPT_SQL_POSTGRESQL);
        assert_eq!(mongo.template().source(), PROMPT_NOSQL_MONGODB);
    }

    #[test]
    fn test_render_prompt_uses_dialect_template() {
        let mongo = OutputSchema::mongodb(SafetyValidator::heuristic());
        let prompt = mongo.render_prompt("users older than 30");

        assert!(prompt.contains("MongoDB"));
        assert!(prompt.contains("Query: users older than 30"));
    }
}
