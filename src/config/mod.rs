//! Configuration management
//!
//! All configuration is sourced from environment variables exactly once at
//! startup and handed to components through their constructors. There are no
//! hidden singletons; tests construct `Config` (or its sections) directly.
//!
//! # Recognized variables
//!
//! - `AMS_BASE_URL`: base URL of the working-memory store
//! - `AMS_CONTEXT_WINDOW_MAX`: message count the store retains per session
//! - `PORT`: inbound HTTP server port
//! - `OPENAI_API_KEY`: completion model credential (required)
//! - `OPENAI_BASE_URL`: completion API base URL
//! - `OPENAI_MODEL`: model name
//! - `OPENAI_TEMPERATURE`: sampling temperature
//! - `LOG_LEVEL`: tracing level (error, warn, info, debug, trace)

use std::env;
use std::str::FromStr;

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Main configuration structure
///
/// Loaded once at startup; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Inbound HTTP server settings
    pub server: ServerConfig,

    /// Working-memory store settings
    pub memory: MemoryStoreConfig,

    /// Completion model settings
    pub model: ModelConfig,

    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

/// Inbound HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the session endpoints are served on
    pub port: u16,
}

/// Working-memory store (AMS) configuration
#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
    /// Base URL for the store's HTTP API
    pub base_url: String,

    /// Maximum number of messages the store retains per session on write
    pub context_window_max: u32,
}

/// Completion model configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Base URL for the completion API
    pub base_url: String,

    /// API credential
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f64,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Every variable except `OPENAI_API_KEY` falls back to a default;
    /// malformed numeric values fail loading rather than being ignored.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                port: parse_var("PORT", default_port())?,
            },
            memory: MemoryStoreConfig {
                base_url: env_or("AMS_BASE_URL", default_ams_base_url()),
                context_window_max: parse_var(
                    "AMS_CONTEXT_WINDOW_MAX",
                    default_context_window_max(),
                )?,
            },
            model: ModelConfig {
                base_url: env_or("OPENAI_BASE_URL", default_openai_base_url()),
                api_key: env::var("OPENAI_API_KEY")
                    .map_err(|_| ConfigError::Missing("OPENAI_API_KEY"))?,
                model: env_or("OPENAI_MODEL", default_openai_model()),
                temperature: parse_var("OPENAI_TEMPERATURE", default_temperature())?,
            },
            log_level: env_or("LOG_LEVEL", default_log_level()),
        })
    }
}

fn env_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn default_port() -> u16 {
    3001
}

fn default_ams_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_context_window_max() -> u32 {
    20
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation is process-wide, so all from_env scenarios run
    // inside a single test to avoid interference between parallel tests.
    #[test]
    fn test_from_env_scenarios() {
        // Missing credential fails loading
        env::remove_var("OPENAI_API_KEY");
        let result = Config::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::Missing("OPENAI_API_KEY"))
        ));

        // Defaults apply when only the credential is set
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::remove_var("PORT");
        env::remove_var("AMS_BASE_URL");
        env::remove_var("AMS_CONTEXT_WINDOW_MAX");
        env::remove_var("OPENAI_BASE_URL");
        env::remove_var("OPENAI_MODEL");
        env::remove_var("OPENAI_TEMPERATURE");
        env::remove_var("LOG_LEVEL");

        let config = Config::from_env().expect("defaults should load");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.memory.base_url, "http://localhost:8000");
        assert_eq!(config.memory.context_window_max, 20);
        assert_eq!(config.model.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model.api_key, "sk-test");
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert_eq!(config.model.temperature, 0.7);
        assert_eq!(config.log_level, "info");

        // Explicit values override defaults
        env::set_var("PORT", "8080");
        env::set_var("AMS_BASE_URL", "http://memory.internal:9000");
        env::set_var("AMS_CONTEXT_WINDOW_MAX", "50");
        env::set_var("OPENAI_MODEL", "gpt-4o");
        env::set_var("OPENAI_TEMPERATURE", "0.2");
        env::set_var("LOG_LEVEL", "debug");

        let config = Config::from_env().expect("overrides should load");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.memory.base_url, "http://memory.internal:9000");
        assert_eq!(config.memory.context_window_max, 50);
        assert_eq!(config.model.model, "gpt-4o");
        assert_eq!(config.model.temperature, 0.2);
        assert_eq!(config.log_level, "debug");

        // Malformed numbers are rejected
        env::set_var("PORT", "not-a-port");
        let result = Config::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));

        env::remove_var("PORT");
        env::set_var("AMS_CONTEXT_WINDOW_MAX", "-3");
        let result = Config::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "AMS_CONTEXT_WINDOW_MAX",
                ..
            })
        ));

        env::remove_var("AMS_CONTEXT_WINDOW_MAX");
        env::remove_var("OPENAI_API_KEY");
    }
}
