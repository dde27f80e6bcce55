//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `WARDROBE_ADVISOR` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use wardrobe_advisor::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Saving analyses under {}", config.runtime.data_dir.display());
//! ```

mod ai;
mod error;
mod resolver;
mod runtime;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use resolver::ResolverConfig;
pub use runtime::{Environment, RuntimeConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// offline configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Runtime configuration (environment, logging, data directory)
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Generative service configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Refusal detector tuning
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `WARDROBE_ADVISOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `WARDROBE_ADVISOR__AI__MODEL=gpt-4o` -> `ai.model = gpt-4o`
    /// - `WARDROBE_ADVISOR__RESOLVER__MIN_RESPONSE_LENGTH=40` -> `resolver.min_response_length = 40`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WARDROBE_ADVISOR")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.runtime.validate()?;
        self.ai.validate()?;
        self.resolver.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.runtime.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "WARDROBE_ADVISOR__RUNTIME__ENVIRONMENT",
        "WARDROBE_ADVISOR__RUNTIME__DATA_DIR",
        "WARDROBE_ADVISOR__AI__OPENAI_API_KEY",
        "WARDROBE_ADVISOR__AI__MODEL",
        "WARDROBE_ADVISOR__AI__MAX_TOKENS",
        "WARDROBE_ADVISOR__AI__MAX_RETRIES",
        "WARDROBE_ADVISOR__RESOLVER__MIN_RESPONSE_LENGTH",
        "WARDROBE_ADVISOR__RESOLVER__EXTRA_REFUSAL_PHRASES",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.runtime.environment, Environment::Development);
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(config.resolver.min_response_length, 30);
        assert_eq!(config.ai.max_retries, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retries_are_opt_in() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("WARDROBE_ADVISOR__AI__MAX_RETRIES", "2");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().ai.max_retries, 2);
    }

    #[test]
    fn test_load_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("WARDROBE_ADVISOR__AI__OPENAI_API_KEY", "sk-test");
        env::set_var("WARDROBE_ADVISOR__AI__MODEL", "gpt-4o");
        env::set_var("WARDROBE_ADVISOR__AI__MAX_TOKENS", "500");
        env::set_var("WARDROBE_ADVISOR__RUNTIME__DATA_DIR", "/var/lib/wardrobe");
        env::set_var("WARDROBE_ADVISOR__RESOLVER__MIN_RESPONSE_LENGTH", "40");
        env::set_var("WARDROBE_ADVISOR__RESOLVER__EXTRA_REFUSAL_PHRASES", "não sei,no idea");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.ai.has_openai());
        assert_eq!(config.ai.model, "gpt-4o");
        assert_eq!(config.ai.max_tokens, 500);
        assert_eq!(config.runtime.data_dir, PathBuf::from("/var/lib/wardrobe"));
        assert_eq!(config.resolver.min_response_length, 40);
        assert_eq!(config.resolver.extra_refusal_phrases_list(), vec!["não sei", "no idea"]);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("WARDROBE_ADVISOR__RUNTIME__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_validate_reports_first_invalid_section() {
        let config = AppConfig {
            resolver: ResolverConfig {
                min_response_length: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMinResponseLength));
    }
}
