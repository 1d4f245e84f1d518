//! Tool call requested by the reasoning engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A request from the reasoning engine to invoke a tool.
///
/// `arguments` is kept exactly as the engine sent it: a JSON object, a
/// JSON-encoded string, or something else entirely. Use
/// [`ToolCall::normalized_arguments`] to get the canonical mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Engine-assigned id used to pair the result with the request
    id: String,

    /// Name of the tool to invoke, as the engine spelled it
    name: String,

    arguments: Value,
}

impl ToolCall {
    /// Creates a new tool call.
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Returns the engine-assigned call id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the arguments as received.
    pub fn arguments(&self) -> &Value {
        &self.arguments
    }

    /// Normalizes the arguments into a plain mapping.
    ///
    /// - object → the object itself
    /// - string holding a JSON object → the decoded object
    /// - empty string or null → empty mapping
    /// - anything else → `{"raw": <text>}`
    pub fn normalized_arguments(&self) -> Map<String, Value> {
        match &self.arguments {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            Value::String(text) => {
                if text.trim().is_empty() {
                    return Map::new();
                }
                match serde_json::from_str::<Value>(text) {
                    Ok(Value::Object(map)) => map,
                    _ => raw_mapping(text.clone()),
                }
            }
            other => raw_mapping(other.to_string()),
        }
    }
}

fn raw_mapping(text: String) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("raw".to_string(), Value::String(text));
    map
}
