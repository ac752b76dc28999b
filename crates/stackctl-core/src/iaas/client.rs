//! Read-only status operations the IaaS wait handlers depend on

use async_trait::async_trait;

use super::models::{Network, NetworkArea};
use crate::error::ApiResult;

/// Network area status reads, scoped to an organization
#[async_trait]
pub trait NetworkAreaClient: Send + Sync {
    async fn get_network_area(&self, organization_id: &str, area_id: &str)
    -> ApiResult<NetworkArea>;
}

/// Network status reads, scoped to a project
#[async_trait]
pub trait NetworkClient: Send + Sync {
    async fn get_network(&self, project_id: &str, network_id: &str) -> ApiResult<Network>;
}
