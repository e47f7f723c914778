use crate::error::SemRouteError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Which encoder implementation backs the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderBackend {
    /// Ollama embedding API
    Ollama,
    /// Deterministic feature-hashing encoder (no model)
    Hash,
}

impl FromStr for EncoderBackend {
    type Err = SemRouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "hash" => Ok(Self::Hash),
            other => Err(SemRouteError::configuration(format!(
                "Unknown encoder backend '{}' (expected 'ollama' or 'hash')",
                other
            ))),
        }
    }
}

/// semroute application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Number of matches returned when a request does not set top_k
    pub default_top_k: usize,

    /// Encoder implementation
    pub encoder_backend: EncoderBackend,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Vector length of the hashing encoder
    pub hash_dimension: usize,

    /// Per-request encoder timeout
    pub encoder_timeout_secs: u64,

    /// Attempts per encoder request
    pub encoder_max_retries: u32,

    /// JSON file with route definitions
    pub routes_path: Option<PathBuf>,

    /// Log directory (console only when unset)
    pub log_dir: Option<PathBuf>,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8081,
            default_top_k: 2,
            encoder_backend: EncoderBackend::Ollama,
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: "all-minilm".to_string(),
            hash_dimension: 384,
            encoder_timeout_secs: 60,
            encoder_max_retries: 3,
            routes_path: None,
            log_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, SemRouteError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();
        let encoder_backend = match std::env::var("ENCODER_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.encoder_backend,
        };

        let config = Self {
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            default_top_k: Self::get_env_parsed("DEFAULT_TOP_K").unwrap_or(defaults.default_top_k),
            encoder_backend,
            ollama_base_url: std::env::var("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            embedding_model: std::env::var("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            hash_dimension: Self::get_env_parsed("HASH_DIMENSION")
                .unwrap_or(defaults.hash_dimension),
            encoder_timeout_secs: Self::get_env_parsed("ENCODER_TIMEOUT_SECS")
                .unwrap_or(defaults.encoder_timeout_secs),
            encoder_max_retries: Self::get_env_parsed("ENCODER_MAX_RETRIES")
                .unwrap_or(defaults.encoder_max_retries),
            routes_path: Self::get_env_path("ROUTES_PATH"),
            log_dir: Self::get_env_path("LOG_DIR"),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Parse environment variable, ignoring unparsable values
    fn get_env_parsed<T: FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SemRouteError> {
        if self.default_top_k == 0 {
            return Err(SemRouteError::configuration("Default top_k must be at least 1"));
        }

        if self.server_port == 0 {
            return Err(SemRouteError::configuration("Server port cannot be 0"));
        }

        if self.encoder_max_retries == 0 {
            return Err(SemRouteError::configuration("Encoder retries must be at least 1"));
        }

        match self.encoder_backend {
            EncoderBackend::Ollama => {
                if !self.ollama_base_url.starts_with("http://")
                    && !self.ollama_base_url.starts_with("https://")
                {
                    return Err(SemRouteError::configuration(
                        "Ollama base URL must start with http:// or https://",
                    ));
                }
                if self.embedding_model.trim().is_empty() {
                    return Err(SemRouteError::configuration(
                        "Embedding model name cannot be empty",
                    ));
                }
            }
            EncoderBackend::Hash => {
                if self.hash_dimension == 0 {
                    return Err(SemRouteError::configuration(
                        "Hash encoder dimension must be at least 1",
                    ));
                }
            }
        }

        Ok(())
    }
}
