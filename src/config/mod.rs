//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SRE_ASSISTANT` prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use sre_assistant::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod agent;
mod ai;
mod documents;
mod error;
mod kubernetes;
mod server;

pub use agent::{AgentConfig, MAX_TOOL_ROUNDS_LIMIT};
pub use ai::AiConfig;
pub use documents::DocumentsConfig;
pub use error::{ConfigError, ValidationError};
pub use kubernetes::KubernetesConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults; only `ai.openai_api_key` must be supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Reasoning engine configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Kubernetes API server connection
    #[serde(default)]
    pub kubernetes: KubernetesConfig,

    /// Runbook index
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Tool-use loop bounds
    #[serde(default)]
    pub agent: AgentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SRE_ASSISTANT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SRE_ASSISTANT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SRE_ASSISTANT__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SRE_ASSISTANT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.kubernetes.validate(self.is_production())?;
        self.documents.validate()?;
        self.agent.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("SRE_ASSISTANT__AI__OPENAI_API_KEY", "sk-test-xxx");
    }

    fn clear_env() {
        for key in [
            "SRE_ASSISTANT__AI__OPENAI_API_KEY",
            "SRE_ASSISTANT__SERVER__PORT",
            "SRE_ASSISTANT__SERVER__ENVIRONMENT",
            "SRE_ASSISTANT__KUBERNETES__DEFAULT_NAMESPACE",
            "SRE_ASSISTANT__KUBERNETES__ACCEPT_INVALID_CERTS",
            "SRE_ASSISTANT__AGENT__MAX_TOOL_ROUNDS",
            "SRE_ASSISTANT__KUBERNETES__KUBECONFIG_PATH",
            "SRE_ASSISTANT__AI__EMBEDDING_MODEL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(config.ai.has_openai());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_without_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let config = AppConfig::load().unwrap();
        clear_env();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.kubernetes.default_namespace, "default");
        assert_eq!(config.agent.max_tool_rounds, 10);
        assert_eq!(config.documents.collection_name, "sre-runbooks");
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SRE_ASSISTANT__SERVER__PORT", "3000");
        env::set_var("SRE_ASSISTANT__KUBERNETES__DEFAULT_NAMESPACE", "payments");
        env::set_var("SRE_ASSISTANT__AGENT__MAX_TOOL_ROUNDS", "4");
        env::set_var("SRE_ASSISTANT__KUBERNETES__KUBECONFIG_PATH", "/home/sre/.kube/config");
        env::set_var("SRE_ASSISTANT__AI__EMBEDDING_MODEL", "text-embedding-3-large");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.kubernetes.default_namespace, "payments");
        assert_eq!(config.agent.max_tool_rounds, 4);
        assert_eq!(
            config.kubernetes.kubeconfig_path.as_deref(),
            Some("/home/sre/.kube/config")
        );
        assert_eq!(config.ai.embedding_model, "text-embedding-3-large");
    }

    #[test]
    fn test_production_rejects_insecure_tls() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SRE_ASSISTANT__SERVER__ENVIRONMENT", "production");
        env::set_var("SRE_ASSISTANT__KUBERNETES__ACCEPT_INVALID_CERTS", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::InsecureTlsInProduction)
        );
    }
}
