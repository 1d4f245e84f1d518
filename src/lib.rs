//! SRE Assistant - conversational diagnosis of Kubernetes problems.
//!
//! A reasoning engine is given a fixed catalogue of cluster and runbook
//! tools and drives them in a bounded tool-use loop. Failed tool calls are
//! recorded and fed back to the engine instead of aborting the turn.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
