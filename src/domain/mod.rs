//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `agent` - Tools, conversation context, usage accounting
//! - `cluster` - Cluster snapshot types returned by the cluster accessor
//! - `analysis` - Heuristic pod issue detection

pub mod agent;
pub mod analysis;
pub mod cluster;
pub mod foundation;
