//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// OpenAI configuration for the reasoning engine
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Chat model used for every turn
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL, overridable for compatible gateways
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Completion token cap per engine call
    pub max_tokens: Option<u32>,

    /// Embedding model for semantic runbook search
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_openai() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("ai.base_url"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("ai.timeout_secs"));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ValidationError::InvalidTemperature);
            }
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            temperature: None,
            max_tokens: None,
            embedding_model: default_embedding_model(),
        }
    }
}

fn default_model() -> String {
    "gpt-4-turbo-preview".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AiConfig {
        AiConfig {
            openai_api_key: Some("sk-xxx".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-4-turbo-preview");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_retries, 3);
        assert!(config.temperature.is_none());
        assert_eq!(config.embedding_model, "text-embedding-3-small");
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 45,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(45));
    }

    #[test]
    fn test_validation_requires_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        );
        let empty = AiConfig {
            openai_api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_temperature() {
        let config = AiConfig {
            temperature: Some(3.5),
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));
    }

    #[test]
    fn test_validation_rejects_bad_base_url() {
        let config = AiConfig {
            base_url: "api.openai.com".to_string(),
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidUrl("ai.base_url")));
    }
}
