//! Tool definition - schema and metadata for a tool.
//!
//! Defines the interface for a tool that the reasoning engine can invoke.

use serde::{Deserialize, Serialize};

use super::ToolName;

/// Whether a tool only observes the cluster or changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolClassification {
    /// Observes cluster or knowledge-base state.
    Read,

    /// Removes a resource. Cannot be undone.
    Destructive,
}

impl ToolClassification {
    /// Returns true for tools that delete resources.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Destructive)
    }
}

/// Definition of a tool that can be invoked by the reasoning engine.
///
/// Contains the schema and documentation needed for:
/// - AI providers (OpenAI tool calling)
/// - Argument validation before dispatch
/// - Read/destructive classification used by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "get_pods")
    name: ToolName,

    /// Human-readable description the engine uses to choose tools
    description: String,

    /// JSON Schema for the parameters
    parameters_schema: serde_json::Value,

    classification: ToolClassification,
}

impl ToolDefinition {
    /// Creates a new tool definition.
    pub fn new(
        name: ToolName,
        description: impl Into<String>,
        parameters_schema: serde_json::Value,
        classification: ToolClassification,
    ) -> Self {
        Self {
            name,
            description: description.into(),
            parameters_schema,
            classification,
        }
    }

    /// Returns the tool name.
    pub fn name(&self) -> ToolName {
        self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters schema.
    pub fn parameters_schema(&self) -> &serde_json::Value {
        &self.parameters_schema
    }

    /// Returns the read/destructive classification.
    pub fn classification(&self) -> ToolClassification {
        self.classification
    }

    /// Converts to OpenAI tool format.
    ///
    /// OpenAI expects a specific structure for function calling.
    pub fn to_openai_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name.as_str(),
                "description": self.description,
                "parameters": self.parameters_schema
            }
        })
    }
}
