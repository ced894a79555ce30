//! Configuration loading and validation for Sommelier.
//!
//! Loads configuration from `sommelier.toml` (path overridable via the
//! `SOMMELIER_CONFIG` environment variable) with environment variable
//! overrides for secrets. Every field has a serde default so an empty
//! file — or no file at all — yields a working development config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The root configuration structure.
///
/// Maps directly to `sommelier.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model provider. Usually supplied via the
    /// `SOMMELIER_API_KEY` or `OPENAI_API_KEY` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Chat model.
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model. Must be the model that produced the corpus
    /// embeddings.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature for chat completions.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// How many recent turn pairs to keep in a prompt window.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// How many documents the search capability returns.
    #[serde(default = "default_search_top_k")]
    pub search_top_k: usize,

    /// Path to the corpus file of precomputed (article, embedding) pairs.
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,

    /// Gateway configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_temperature() -> f32 {
    0.5
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_history_window() -> usize {
    4
}
fn default_search_top_k() -> usize {
    3
}
fn default_corpus_path() -> String {
    "data/corpus.json".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        // An empty TOML document deserializes to all defaults.
        toml::from_str("").expect("empty config must deserialize")
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("history_window", &self.history_window)
            .field("search_top_k", &self.search_top_k)
            .field("corpus_path", &self.corpus_path)
            .field("gateway", &self.gateway)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default location with env overrides.
    ///
    /// Resolution order: `SOMMELIER_CONFIG` path if set, otherwise
    /// `./sommelier.toml` if it exists, otherwise all defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SOMMELIER_CONFIG")
            .unwrap_or_else(|_| "sommelier.toml".into());
        let mut config = if Path::new(&path).exists() {
            Self::load_from(&path)?
        } else {
            tracing::debug!(path = %path, "No config file found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path (no existence fallback).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// Apply environment variable overrides for secrets.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("SOMMELIER_API_KEY") {
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                self.api_key = Some(key);
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".into()));
        }
        if self.embedding_model.is_empty() {
            return Err(ConfigError::Invalid(
                "embedding_model must not be empty".into(),
            ));
        }
        if self.history_window == 0 {
            return Err(ConfigError::Invalid(
                "history_window must be at least 1".into(),
            ));
        }
        if self.search_top_k == 0 {
            return Err(ConfigError::Invalid(
                "search_top_k must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature {} out of range [0.0, 2.0]",
                self.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_window, 4);
        assert_eq!(config.search_top_k, 3);
        assert!((config.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.gateway.port, 8080);
    }

    #[test]
    fn loads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"gpt-4o\"\n\n[gateway]\nport = 9000").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.gateway.port, 9000);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.embedding_model, "text-embedding-3-small");
    }

    #[test]
    fn rejects_zero_window() {
        let config: AppConfig = toml::from_str("history_window = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let config: AppConfig = toml::from_str("temperature = 3.5").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config: AppConfig = toml::from_str("api_key = \"sk-secret\"").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn missing_file_is_an_error_with_path() {
        let err = AppConfig::load_from("/nonexistent/sommelier.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sommelier.toml"));
    }
}
