//! Runbook index configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Directory indexed at startup
    pub seed_directory: Option<String>,

    /// Extensions indexed from directories (comma-separated)
    #[serde(default = "default_file_extensions")]
    pub file_extensions: String,
}

impl DocumentsConfig {
    pub fn extensions(&self) -> Vec<String> {
        self.file_extensions
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.extensions().is_empty() {
            return Err(ValidationError::NoFileExtensions);
        }
        Ok(())
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            collection_name: default_collection_name(),
            seed_directory: None,
            file_extensions: default_file_extensions(),
        }
    }
}

fn default_collection_name() -> String {
    "sre-runbooks".to_string()
}

fn default_file_extensions() -> String {
    ".md,.txt".to_string()
}
