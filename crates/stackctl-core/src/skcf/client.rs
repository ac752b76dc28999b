//! Read-only status operations the SKCF wait handlers depend on
//!
//! [`StackitClient`](crate::http::StackitClient) implements these over HTTP;
//! tests implement them with in-memory mocks.

use async_trait::async_trait;

use super::models::{Cluster, ListClustersResponse, ProjectResponse};
use crate::error::ApiResult;

/// Cluster status reads
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn get_cluster(&self, project_id: &str, name: &str) -> ApiResult<Cluster>;

    async fn list_clusters(&self, project_id: &str) -> ApiResult<ListClustersResponse>;
}

/// Service enablement status reads
#[async_trait]
pub trait ProjectClient: Send + Sync {
    async fn get_service_status(&self, project_id: &str) -> ApiResult<ProjectResponse>;
}
