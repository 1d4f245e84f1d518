//! Agent orchestration: tool dispatch and the tool-use loop.

mod agent_loop;
mod dependency_context;
mod dispatcher;
mod error;

pub use agent_loop::{AgentLoop, AgentLoopConfig, EMPTY_RESPONSE_FALLBACK, ROUND_LIMIT_FALLBACK};
pub use dependency_context::DependencyContext;
pub use dispatcher::ToolDispatcher;
pub use error::{AgentError, ToolExecutionError};
