//! Application layer - agent orchestration and handlers.
//!
//! This layer drives turns against the reasoning engine and coordinates
//! the cluster and document collaborators through their ports.

pub mod agent;
pub mod handlers;

pub use agent::{
    AgentError, AgentLoop, AgentLoopConfig, DependencyContext, ToolDispatcher, ToolExecutionError,
};
pub use handlers::{
    AnalyzePodsCommand, AnalyzePodsError, AnalyzePodsHandler, AnalyzePodsResult,
    SendMessageCommand, SendMessageError, SendMessageHandler,
};
