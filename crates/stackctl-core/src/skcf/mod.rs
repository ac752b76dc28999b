//! SKCF clusters and service enablement
//!
//! Status models, the read-only client traits the handlers depend on, and
//! the wait handlers themselves.

pub mod client;
pub mod models;
pub mod wait;

pub use client::{ClusterClient, ProjectClient};
pub use models::{
    Cluster, ClusterState, ClusterStatus, ListClustersResponse, ProjectResponse, ProjectState,
};
pub use wait::{
    CLUSTER_TIMEOUT, SERVICE_TIMEOUT, create_or_update_cluster_wait_handler,
    delete_cluster_wait_handler, disable_service_wait_handler, enable_service_wait_handler,
};
