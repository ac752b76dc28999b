//! Wait handlers for SKCF cluster and service lifecycle operations
//!
//! Each resource signals completion differently:
//!
//! | Operation | Probe | Done when |
//! |---|---|---|
//! | create/update cluster | get cluster | aggregated state is `STATE_HEALTHY` (fails on `STATE_FAILED`) |
//! | delete cluster | list clusters | the name is no longer listed |
//! | enable service | get service status | state is `STATE_CREATED` (fails on `STATE_DELETING`/`STATE_FAILED`) |
//! | disable service | get service status | the status read returns 404 or 403 |
//!
//! Deleting a cluster has no failure state of its own; only a failing list
//! call ends that wait early.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use stackctl_core::skcf::create_or_update_cluster_wait_handler;
//!
//! let cluster = create_or_update_cluster_wait_handler(&client, "project-id", "my-cluster")
//!     .with_timeout(Duration::from_secs(1800))
//!     .wait()
//!     .await?;
//! ```

use std::time::Duration;

use super::client::{ClusterClient, ProjectClient};
use super::models::{Cluster, ClusterState, ListClustersResponse, ProjectResponse, ProjectState};
use crate::wait::outcome::Presence;
use crate::wait::{AsyncWait, Outcome};

/// Default timeout for cluster create, update and delete (45 minutes)
pub const CLUSTER_TIMEOUT: Duration = Duration::from_secs(45 * 60);

/// Default timeout for enabling or disabling the service (15 minutes)
pub const SERVICE_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Wait until a created or updated cluster is healthy
pub fn create_or_update_cluster_wait_handler<'a, C>(
    client: &'a C,
    project_id: &str,
    name: &str,
) -> AsyncWait<'a, Cluster>
where
    C: ClusterClient + ?Sized,
{
    let operation = format!("create or update cluster {name} in project {project_id}");
    let project_id = project_id.to_string();
    let name = name.to_string();

    AsyncWait::new(
        operation,
        move || {
            let project_id = project_id.clone();
            let name = name.clone();
            async move { client.get_cluster(&project_id, &name).await }
        },
        cluster_outcome,
    )
    .with_timeout(CLUSTER_TIMEOUT)
}

/// Wait until a deleted cluster disappears from the project's listing
///
/// Succeeds with the first listing that no longer contains the cluster.
pub fn delete_cluster_wait_handler<'a, C>(
    client: &'a C,
    project_id: &str,
    name: &str,
) -> AsyncWait<'a, ListClustersResponse>
where
    C: ClusterClient + ?Sized,
{
    let operation = format!("delete cluster {name} in project {project_id}");
    let project_id = project_id.to_string();
    let name = name.to_string();

    AsyncWait::new(
        operation,
        move || {
            let project_id = project_id.clone();
            async move { client.list_clusters(&project_id).await }
        },
        move |listing: ListClustersResponse| {
            if listing.contains(&name) {
                Outcome::Pending
            } else {
                Outcome::Succeeded(listing)
            }
        },
    )
    .with_timeout(CLUSTER_TIMEOUT)
}

/// Wait until the service is enabled for a project
pub fn enable_service_wait_handler<'a, C>(
    client: &'a C,
    project_id: &str,
) -> AsyncWait<'a, ProjectResponse>
where
    C: ProjectClient + ?Sized,
{
    let operation = format!("enable service in project {project_id}");
    let probe_project = project_id.to_string();
    let project_id = project_id.to_string();

    AsyncWait::new(
        operation,
        move || {
            let project_id = probe_project.clone();
            async move { client.get_service_status(&project_id).await }
        },
        move |project: ProjectResponse| match project.state.clone() {
            Some(ProjectState::Created) => Outcome::Succeeded(project),
            Some(state @ (ProjectState::Deleting | ProjectState::Failed)) => Outcome::failed(
                format!("received state: {state} for project {project_id}"),
            ),
            _ => Outcome::Pending,
        },
    )
    .with_timeout(SERVICE_TIMEOUT)
}

/// Wait until the service is disabled for a project
///
/// The status read starts failing with 404 or 403 once the service is gone;
/// that is the success signal. Any other error ends the wait with that error.
pub fn disable_service_wait_handler<'a, C>(client: &'a C, project_id: &str) -> AsyncWait<'a, ()>
where
    C: ProjectClient + ?Sized,
{
    let operation = format!("disable service in project {project_id}");
    let project_id = project_id.to_string();

    AsyncWait::new(
        operation,
        move || {
            let project_id = project_id.clone();
            async move {
                match client.get_service_status(&project_id).await {
                    Ok(_) => Ok(Presence::Present),
                    Err(err) if err.is_not_found() || err.is_forbidden() => Ok(Presence::Absent),
                    Err(err) => Err(err),
                }
            }
        },
        |presence: Presence| match presence {
            Presence::Absent => Outcome::Succeeded(()),
            Presence::Present => Outcome::Pending,
        },
    )
    .with_timeout(SERVICE_TIMEOUT)
}

fn cluster_outcome(cluster: Cluster) -> Outcome<Cluster> {
    match cluster.aggregated_state() {
        Some(ClusterState::Healthy) => Outcome::Succeeded(cluster),
        Some(ClusterState::Failed) => Outcome::failed_with(
            format!(
                "create or update failed: cluster {} is in state {}",
                cluster.name.as_deref().unwrap_or("<unnamed>"),
                ClusterState::Failed
            ),
            cluster,
        ),
        _ => Outcome::Pending,
    }
}
