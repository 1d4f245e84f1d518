//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, and error types that form the
//! vocabulary of the assistant domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ToolInvocationId, TurnId};
pub use timestamp::Timestamp;
