//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod chat;

pub use chat::{
    AnalyzePodsCommand, AnalyzePodsError, AnalyzePodsHandler, AnalyzePodsResult,
    SendMessageCommand, SendMessageError, SendMessageHandler,
};
