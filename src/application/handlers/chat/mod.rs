//! Chat and proactive analysis handlers.

mod analyze_pods;
mod send_message;

pub use analyze_pods::{AnalyzePodsCommand, AnalyzePodsError, AnalyzePodsHandler, AnalyzePodsResult};
pub use send_message::{SendMessageCommand, SendMessageError, SendMessageHandler};
