//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - OpenAI chat completions and a scripted mock
//! - `kubernetes` - Kubernetes REST client and an in-memory mock
//! - `documents` - In-memory runbook index
//! - `http` - Axum routers

pub mod ai;
pub mod documents;
pub mod http;
pub mod kubernetes;
