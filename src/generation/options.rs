//! Options forwarded to the completion backend.
//!
//! The generator never interprets these; they are handed to the backend as-is.

/// A single tunable generation parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelParam {
    Temperature(f64),
    MaxTokens(u32),
    TopP(f64),
}

/// Model identifier plus an enumerated list of parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    pub model: String,
    pub params: Vec<ModelParam>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            params: vec![ModelParam::Temperature(0.0), ModelParam::MaxTokens(512)],
        }
    }
}

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

impl ModelOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter, replacing any earlier parameter of the same kind.
    pub fn with_param(mut self, param: ModelParam) -> Self {
        self.params
            .retain(|p| std::mem::discriminant(p) != std::mem::discriminant(&param));
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[ModelParam] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ModelOptions::default();

        assert_eq!(options.model, DEFAULT_MODEL);
        assert!(options.params().contains(&ModelParam::Temperature(0.0)));
    }

    #[test]
    fn test_with_param_replaces_same_kind() {
        let options = ModelOptions::new("gpt-4o")
            .with_param(ModelParam::Temperature(0.7))
            .with_param(ModelParam::MaxTokens(256))
            .with_param(ModelParam::Temperature(0.2));

        assert_eq!(
            options.params(),
            &[ModelParam::MaxTokens(256), ModelParam::Temperature(0.2)]
        );
    }
}
