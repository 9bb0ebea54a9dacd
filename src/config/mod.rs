//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SQLGEN_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::cache::DEFAULT_DISTANCE_THRESHOLD;
use crate::embedding::{DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL, EmbedderConfig};
use crate::generation::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT, GeneratorConfig, ModelOptions,
    ModelParam,
};
use crate::validation::SafetyValidator;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SQLGEN_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Redis endpoint for the exact-match cache.
    pub redis_url: String,

    /// Qdrant endpoint for the semantic cache.
    pub qdrant_url: String,

    /// OpenAI-compatible embeddings base URL. `None` runs the stub embedder.
    pub embedding_url: Option<String>,
    pub embedding_model: String,
    pub embedding_dim: usize,
    pub embedding_api_key: Option<String>,

    /// Completion model identifier passed to genai.
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,

    /// Total generation attempts per request (initial call plus reasks).
    pub max_attempts: u32,

    /// Timeout for every backend call.
    pub request_timeout: Duration,

    /// Default semantic distance threshold, in `[0, 1]`.
    pub distance_threshold: f32,

    /// `llm` or `heuristic`.
    pub safety_screen: String,
}

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_SAFETY_SCREEN: &str = "llm";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            embedding_url: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            embedding_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: 512,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            safety_screen: DEFAULT_SAFETY_SCREEN.to_string(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SQLGEN_PORT";
    const ENV_BIND_ADDR: &'static str = "SQLGEN_BIND_ADDR";
    const ENV_REDIS_URL: &'static str = "SQLGEN_REDIS_URL";
    const ENV_QDRANT_URL: &'static str = "SQLGEN_QDRANT_URL";
    const ENV_EMBEDDING_URL: &'static str = "SQLGEN_EMBEDDING_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "SQLGEN_EMBEDDING_MODEL";
    const ENV_EMBEDDING_DIM: &'static str = "SQLGEN_EMBEDDING_DIM";
    const ENV_EMBEDDING_API_KEY: &'static str = "SQLGEN_EMBEDDING_API_KEY";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_MODEL: &'static str = "SQLGEN_MODEL";
    const ENV_TEMPERATURE: &'static str = "SQLGEN_TEMPERATURE";
    const ENV_MAX_TOKENS: &'static str = "SQLGEN_MAX_TOKENS";
    const ENV_MAX_ATTEMPTS: &'static str = "SQLGEN_MAX_ATTEMPTS";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "SQLGEN_REQUEST_TIMEOUT_SECS";
    const ENV_DISTANCE_THRESHOLD: &'static str = "SQLGEN_DISTANCE_THRESHOLD";
    const ENV_SAFETY_SCREEN: &'static str = "SQLGEN_SAFETY_SCREEN";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let redis_url = Self::parse_string_from_env(Self::ENV_REDIS_URL, defaults.redis_url);
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let embedding_url = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_URL);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_dim = Self::parse_number_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let embedding_api_key = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_API_KEY)
            .or_else(|| Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY));
        let model = Self::parse_string_from_env(Self::ENV_MODEL, defaults.model);
        let temperature = Self::parse_number_from_env(Self::ENV_TEMPERATURE, defaults.temperature)?;
        let max_tokens = Self::parse_number_from_env(Self::ENV_MAX_TOKENS, defaults.max_tokens)?;
        let max_attempts =
            Self::parse_number_from_env(Self::ENV_MAX_ATTEMPTS, defaults.max_attempts)?;
        let request_timeout = Duration::from_secs(Self::parse_number_from_env(
            Self::ENV_REQUEST_TIMEOUT_SECS,
            defaults.request_timeout.as_secs(),
        )?);
        let distance_threshold =
            Self::parse_number_from_env(Self::ENV_DISTANCE_THRESHOLD, defaults.distance_threshold)?;
        let safety_screen = Self::parse_string_from_env(Self::ENV_SAFETY_SCREEN, defaults.safety_screen)
            .trim()
            .to_lowercase();

        Ok(Self {
            port,
            bind_addr,
            redis_url,
            qdrant_url,
            embedding_url,
            embedding_model,
            embedding_dim,
            embedding_api_key,
            model,
            temperature,
            max_tokens,
            max_attempts,
            request_timeout,
            distance_threshold,
            safety_screen,
        })
    }

    /// Checks value ranges. Does not contact any backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.distance_threshold) {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_DISTANCE_THRESHOLD,
                reason: format!("{} is outside [0, 1]", self.distance_threshold),
            });
        }

        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_ATTEMPTS,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_REQUEST_TIMEOUT_SECS,
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                reason: "must be greater than 0".to_string(),
            });
        }

        self.safety_validator()?;
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn safety_validator(&self) -> Result<SafetyValidator, ConfigError> {
        match self.safety_screen.as_str() {
            "llm" => Ok(SafetyValidator::llm_judge()),
            "heuristic" => Ok(SafetyValidator::heuristic()),
            other => Err(ConfigError::UnknownSafetyScreen {
                value: other.to_string(),
            }),
        }
    }

    pub fn model_options(&self) -> ModelOptions {
        ModelOptions::new(self.model.clone())
            .with_param(ModelParam::Temperature(self.temperature))
            .with_param(ModelParam::MaxTokens(self.max_tokens))
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::default()
            .max_attempts(self.max_attempts)
            .request_timeout(self.request_timeout)
            .options(self.model_options())
    }

    pub fn embedder_config(&self) -> EmbedderConfig {
        let base = match &self.embedding_url {
            Some(url) => EmbedderConfig::http(url.clone(), self.embedding_model.clone()),
            None => EmbedderConfig::stub(),
        };
        base.api_key(self.embedding_api_key.clone())
            .embedding_dim(self.embedding_dim)
            .timeout(self.request_timeout)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name: var_name,
                    reason: format!("'{}': {}", value, e),
                }),
            Err(_) => Ok(default),
        }
    }
}
