//! Cluster HTTP adapter - read-only views of Kubernetes resources.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::ClusterHandlers;
pub use routes::cluster_routes;
