//! Documents HTTP adapter - runbook index management and search.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::DocumentHandlers;
pub use routes::document_routes;
