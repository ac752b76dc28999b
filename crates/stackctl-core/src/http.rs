//! HTTP status client for the STACKIT APIs
//!
//! [`StackitClient`] implements every status trait the wait handlers need
//! with plain authenticated GET requests. It never mutates anything.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{ApiError, ApiResult};
use crate::iaas::{Network, NetworkArea, NetworkAreaClient, NetworkClient};
use crate::skcf::{Cluster, ClusterClient, ListClustersResponse, ProjectClient, ProjectResponse};

/// Per-request timeout for a single status read
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URLs of the APIs the client talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub skcf: String,
    pub iaas: String,
}

/// Read-only client for SKCF and IaaS resource status
#[derive(Debug, Clone)]
pub struct StackitClient {
    http: Client,
    endpoints: Endpoints,
    token: Option<String>,
}

impl StackitClient {
    pub fn new(endpoints: Endpoints, token: Option<String>) -> ApiResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("stackctl/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoints,
            token,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> ApiResult<T> {
        trace!(%url, "GET");
        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    trace!(%url, error = %e, "Failed to read error body");
                    String::new()
                }
            };
            return Err(status_error(status, body));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn status_error(status: StatusCode, body: String) -> ApiError {
    let body = body.trim();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        body.to_string()
    };
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[async_trait]
impl ClusterClient for StackitClient {
    async fn get_cluster(&self, project_id: &str, name: &str) -> ApiResult<Cluster> {
        self.get_json(format!(
            "{}/v1alpha1/projects/{}/clusters/{}",
            self.endpoints.skcf,
            segment(project_id),
            segment(name)
        ))
        .await
    }

    async fn list_clusters(&self, project_id: &str) -> ApiResult<ListClustersResponse> {
        self.get_json(format!(
            "{}/v1alpha1/projects/{}/clusters",
            self.endpoints.skcf,
            segment(project_id)
        ))
        .await
    }
}

#[async_trait]
impl ProjectClient for StackitClient {
    async fn get_service_status(&self, project_id: &str) -> ApiResult<ProjectResponse> {
        self.get_json(format!(
            "{}/v1alpha1/projects/{}",
            self.endpoints.skcf,
            segment(project_id)
        ))
        .await
    }
}

#[async_trait]
impl NetworkAreaClient for StackitClient {
    async fn get_network_area(
        &self,
        organization_id: &str,
        area_id: &str,
    ) -> ApiResult<NetworkArea> {
        self.get_json(format!(
            "{}/v1alpha1/organizations/{}/network-areas/{}",
            self.endpoints.iaas,
            segment(organization_id),
            segment(area_id)
        ))
        .await
    }
}

#[async_trait]
impl NetworkClient for StackitClient {
    async fn get_network(&self, project_id: &str, network_id: &str) -> ApiResult<Network> {
        self.get_json(format!(
            "{}/v1alpha1/projects/{}/networks/{}",
            self.endpoints.iaas,
            segment(project_id),
            segment(network_id)
        ))
        .await
    }
}
