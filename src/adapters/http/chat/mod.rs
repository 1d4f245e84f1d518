//! Chat HTTP adapter - conversational turns and proactive analysis.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::ChatHandlers;
pub use routes::chat_routes;
