//! Conversation history and the context block handed to the engine.

use serde::{Deserialize, Serialize};

/// Marker identifying the canned greeting the chat UI shows first.
pub const DEFAULT_GREETING_MARKER: &str = "Hello! I'm your SRE AI Assistant";

/// Role of a message in caller-supplied history. Entries without a role
/// are treated as user messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    #[default]
    User,
    Assistant,
    /// Any other role; kept in history but not rendered.
    #[serde(other)]
    Other,
}

/// One prior message supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    #[serde(default)]
    pub role: ConversationRole,
    #[serde(default)]
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ConversationRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ConversationRole::Assistant,
            content: content.into(),
        }
    }
}

/// Turns prior history, the default namespace and the new message into the
/// single text block the agent loop sends as the user prompt.
///
/// The caller's history is only borrowed; nothing is mutated.
#[derive(Debug, Clone)]
pub struct ConversationContextBuilder {
    greeting_marker: String,
}

impl Default for ConversationContextBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING_MARKER)
    }
}

impl ConversationContextBuilder {
    pub fn new(greeting_marker: impl Into<String>) -> Self {
        Self {
            greeting_marker: greeting_marker.into(),
        }
    }

    /// True for the canned greeting: an assistant message containing the marker.
    pub fn is_greeting(&self, message: &ConversationMessage) -> bool {
        !self.greeting_marker.is_empty()
            && message.role == ConversationRole::Assistant
            && message.content.contains(&self.greeting_marker)
    }

    /// History with greeting messages removed, order preserved.
    pub fn filter_history<'a>(
        &self,
        history: &'a [ConversationMessage],
    ) -> Vec<&'a ConversationMessage> {
        history.iter().filter(|m| !self.is_greeting(m)).collect()
    }

    /// Builds the prompt for a turn.
    pub fn build(&self, history: &[ConversationMessage], message: &str, namespace: &str) -> String {
        let filtered = self.filter_history(history);
        let namespace_line = format!("[Current default namespace: {}]", namespace);

        if filtered.is_empty() {
            return format!("{}\n\n{}", namespace_line, message);
        }

        let mut lines = Vec::with_capacity(filtered.len() + 4);
        lines.push(namespace_line);
        lines.push("\n[Previous conversation in this session:]".to_string());

        for entry in filtered {
            match entry.role {
                ConversationRole::User => lines.push(format!("\nUser said: {}", entry.content)),
                ConversationRole::Assistant => lines.push(format!(
                    "\nYou (assistant) previously responded: {}",
                    entry.content
                )),
                ConversationRole::Other => {}
            }
        }

        lines.push("\n\n[Current user message in this ongoing conversation:]".to_string());
        lines.push(message.to_string());

        lines.join("\n")
    }
}
