//! Tool Registry - lookup table for tool definitions.
//!
//! Definitions keep their registration order so the engine always sees the
//! catalogue in the same sequence.

use std::collections::HashMap;

use super::{ToolClassification, ToolDefinition, ToolName};

/// Registry of the tools the reasoning engine may call.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<ToolName, ToolDefinition>,
    order: Vec<ToolName>,
}

impl ToolRegistry {
    /// Creates a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, replacing any previous definition with the same name.
    pub fn register(&mut self, definition: ToolDefinition) {
        let name = definition.name();
        if self.tools.insert(name, definition).is_none() {
            self.order.push(name);
        }
    }

    /// Gets a tool definition by name.
    pub fn get_tool(&self, name: ToolName) -> Option<&ToolDefinition> {
        self.tools.get(&name)
    }

    /// Checks if a tool exists.
    pub fn has_tool(&self, name: ToolName) -> bool {
        self.tools.contains_key(&name)
    }

    /// All definitions in registration order.
    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        self.order.iter().filter_map(|n| self.tools.get(n)).collect()
    }

    /// Definitions with the given classification, in registration order.
    pub fn with_classification(&self, classification: ToolClassification) -> Vec<&ToolDefinition> {
        self.definitions()
            .into_iter()
            .filter(|d| d.classification() == classification)
            .collect()
    }

    /// Returns all registered tool names.
    pub fn all_tool_names(&self) -> Vec<&'static str> {
        self.order.iter().map(|n| n.as_str()).collect()
    }

    /// Returns the total number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Exports every tool in OpenAI format.
    pub fn to_openai_tools(&self) -> Vec<serde_json::Value> {
        self.definitions()
            .into_iter()
            .map(|d| d.to_openai_format())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tool(name: ToolName) -> ToolDefinition {
        ToolDefinition::new(
            name,
            format!("Test tool {}", name),
            serde_json::json!({"type": "object"}),
            name.classification(),
        )
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.tool_count(), 0);
        assert!(registry.definitions().is_empty());
    }

    #[test]
    fn register_preserves_order() {
        let mut registry = ToolRegistry::new();
        registry.register(sample_tool(ToolName::GetPods));
        registry.register(sample_tool(ToolName::DeletePod));
        registry.register(sample_tool(ToolName::GetEvents));

        assert_eq!(
            registry.all_tool_names(),
            vec!["get_pods", "delete_pod", "get_events"]
        );
    }

    #[test]
    fn re_registering_replaces_without_duplicating() {
        let mut registry = ToolRegistry::new();
        registry.register(sample_tool(ToolName::GetPods));
        registry.register(ToolDefinition::new(
            ToolName::GetPods,
            "Updated",
            serde_json::json!({}),
            ToolClassification::Read,
        ));

        assert_eq!(registry.tool_count(), 1);
        assert_eq!(
            registry.get_tool(ToolName::GetPods).unwrap().description(),
            "Updated"
        );
    }

    #[test]
    fn with_classification_filters() {
        let mut registry = ToolRegistry::new();
        registry.register(sample_tool(ToolName::GetPods));
        registry.register(sample_tool(ToolName::DeleteService));

        let destructive = registry.with_classification(ToolClassification::Destructive);
        assert_eq!(destructive.len(), 1);
        assert_eq!(destructive[0].name(), ToolName::DeleteService);
    }

    #[test]
    fn to_openai_tools_returns_formatted_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(sample_tool(ToolName::GetNamespaces));

        let tools = registry.to_openai_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["function"]["name"], "get_namespaces");
    }
}
