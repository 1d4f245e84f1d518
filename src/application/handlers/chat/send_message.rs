//! SendMessageHandler - runs one conversational turn.

use std::sync::Arc;
use thiserror::Error;

use crate::application::agent::{AgentError, AgentLoop, DependencyContext};
use crate::domain::agent::{AgentResponse, ConversationContextBuilder, ConversationMessage};
use crate::ports::{ClusterAccessor, DocumentSearch};

/// A chat message from the user.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub message: String,
    /// Default namespace for this turn; blank means the configured default
    pub namespace: Option<String>,
    pub history: Vec<ConversationMessage>,
}

#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Builds the turn context and hands it to the agent loop.
pub struct SendMessageHandler {
    cluster: Arc<dyn ClusterAccessor>,
    documents: Arc<dyn DocumentSearch>,
    context_builder: ConversationContextBuilder,
    agent: AgentLoop,
    default_namespace: String,
}

impl SendMessageHandler {
    pub fn new(
        cluster: Arc<dyn ClusterAccessor>,
        documents: Arc<dyn DocumentSearch>,
        context_builder: ConversationContextBuilder,
        agent: AgentLoop,
        default_namespace: impl Into<String>,
    ) -> Self {
        Self {
            cluster,
            documents,
            context_builder,
            agent,
            default_namespace: default_namespace.into(),
        }
    }

    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<AgentResponse, SendMessageError> {
        if cmd.message.trim().is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }

        let namespace = cmd
            .namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .unwrap_or(&self.default_namespace);

        tracing::debug!(namespace, history = cmd.history.len(), "Handling chat message");

        let prompt = self.context_builder.build(&cmd.history, &cmd.message, namespace);
        let ctx = DependencyContext::new(self.cluster.clone(), Arc::clone(&self.documents), namespace);

        Ok(self.agent.run(&prompt, &ctx).await?)
    }
}
