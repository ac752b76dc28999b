//! Wait handlers for IaaS network areas and networks
//!
//! Create and update finish when the resource reports `CREATED` (or
//! `UPDATED` for network areas). Delete finishes when the read returns 404
//! or the resource reports `DELETED`. `ERROR` and `FAILED` end any of them.

use std::time::Duration;

use futures::future::BoxFuture;

use super::client::{NetworkAreaClient, NetworkClient};
use super::models::{Network, NetworkArea, NetworkAreaState, NetworkState};
use crate::error::ApiResult;
use crate::wait::{AsyncWait, Outcome};

/// Default timeout for network and network area operations (20 minutes)
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Map a 404 to "gone"; every other error stays an error
fn gone_on_not_found<T>(result: ApiResult<T>) -> ApiResult<Option<T>> {
    match result {
        Ok(resource) => Ok(Some(resource)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

fn area_probe<'a, C>(
    client: &'a C,
    organization_id: String,
    area_id: String,
) -> impl FnMut() -> BoxFuture<'a, ApiResult<NetworkArea>> + Send + 'a
where
    C: NetworkAreaClient + ?Sized,
{
    move || -> BoxFuture<'a, ApiResult<NetworkArea>> {
        let organization_id = organization_id.clone();
        let area_id = area_id.clone();
        Box::pin(async move { client.get_network_area(&organization_id, &area_id).await })
    }
}

fn network_probe<'a, C>(
    client: &'a C,
    project_id: String,
    network_id: String,
) -> impl FnMut() -> BoxFuture<'a, ApiResult<Network>> + Send + 'a
where
    C: NetworkClient + ?Sized,
{
    move || -> BoxFuture<'a, ApiResult<Network>> {
        let project_id = project_id.clone();
        let network_id = network_id.clone();
        Box::pin(async move { client.get_network(&project_id, &network_id).await })
    }
}

/// Wait until a new network area is created
pub fn create_network_area_wait_handler<'a, C>(
    client: &'a C,
    organization_id: &str,
    area_id: &str,
) -> AsyncWait<'a, NetworkArea>
where
    C: NetworkAreaClient + ?Sized,
{
    AsyncWait::new(
        format!("create network area {area_id} in organization {organization_id}"),
        area_probe(client, organization_id.to_string(), area_id.to_string()),
        |area: NetworkArea| area_outcome(area, &[NetworkAreaState::Created]),
    )
    .with_timeout(NETWORK_TIMEOUT)
}

/// Wait until an updated network area settles
pub fn update_network_area_wait_handler<'a, C>(
    client: &'a C,
    organization_id: &str,
    area_id: &str,
) -> AsyncWait<'a, NetworkArea>
where
    C: NetworkAreaClient + ?Sized,
{
    AsyncWait::new(
        format!("update network area {area_id} in organization {organization_id}"),
        area_probe(client, organization_id.to_string(), area_id.to_string()),
        |area: NetworkArea| {
            area_outcome(
                area,
                &[NetworkAreaState::Updated, NetworkAreaState::Created],
            )
        },
    )
    .with_timeout(NETWORK_TIMEOUT)
}

/// Wait until a network area is gone
pub fn delete_network_area_wait_handler<'a, C>(
    client: &'a C,
    organization_id: &str,
    area_id: &str,
) -> AsyncWait<'a, ()>
where
    C: NetworkAreaClient + ?Sized,
{
    let mut probe = area_probe(client, organization_id.to_string(), area_id.to_string());
    AsyncWait::new(
        format!("delete network area {area_id} in organization {organization_id}"),
        move || {
            let read = probe();
            async move { gone_on_not_found(read.await) }
        },
        |area: Option<NetworkArea>| match area.map(|a| a.state) {
            None | Some(Some(NetworkAreaState::Deleted)) => Outcome::Succeeded(()),
            Some(Some(state)) if state.is_failure() => {
                Outcome::failed(format!("network area deletion failed with state {state}"))
            }
            Some(_) => Outcome::Pending,
        },
    )
    .with_timeout(NETWORK_TIMEOUT)
}

/// Wait until a new network is created
pub fn create_network_wait_handler<'a, C>(
    client: &'a C,
    project_id: &str,
    network_id: &str,
) -> AsyncWait<'a, Network>
where
    C: NetworkClient + ?Sized,
{
    AsyncWait::new(
        format!("create network {network_id} in project {project_id}"),
        network_probe(client, project_id.to_string(), network_id.to_string()),
        network_outcome,
    )
    .with_timeout(NETWORK_TIMEOUT)
}

/// Wait until an updated network settles back into `CREATED`
pub fn update_network_wait_handler<'a, C>(
    client: &'a C,
    project_id: &str,
    network_id: &str,
) -> AsyncWait<'a, Network>
where
    C: NetworkClient + ?Sized,
{
    AsyncWait::new(
        format!("update network {network_id} in project {project_id}"),
        network_probe(client, project_id.to_string(), network_id.to_string()),
        network_outcome,
    )
    .with_timeout(NETWORK_TIMEOUT)
}

/// Wait until a network is gone
pub fn delete_network_wait_handler<'a, C>(
    client: &'a C,
    project_id: &str,
    network_id: &str,
) -> AsyncWait<'a, ()>
where
    C: NetworkClient + ?Sized,
{
    let mut probe = network_probe(client, project_id.to_string(), network_id.to_string());
    AsyncWait::new(
        format!("delete network {network_id} in project {project_id}"),
        move || {
            let read = probe();
            async move { gone_on_not_found(read.await) }
        },
        |network: Option<Network>| match network.map(|n| n.state) {
            None | Some(Some(NetworkState::Deleted)) => Outcome::Succeeded(()),
            Some(Some(state)) if state.is_failure() => {
                Outcome::failed(format!("network deletion failed with state {state}"))
            }
            Some(_) => Outcome::Pending,
        },
    )
    .with_timeout(NETWORK_TIMEOUT)
}

fn area_outcome(area: NetworkArea, done: &[NetworkAreaState]) -> Outcome<NetworkArea> {
    match area.state.clone() {
        Some(state) if done.contains(&state) => Outcome::Succeeded(area),
        Some(state) if state.is_failure() => {
            Outcome::failed_with(format!("network area reached state {state}"), area)
        }
        _ => Outcome::Pending,
    }
}

fn network_outcome(network: Network) -> Outcome<Network> {
    match network.state.clone() {
        Some(NetworkState::Created) => Outcome::Succeeded(network),
        Some(state) if state.is_failure() => {
            Outcome::failed_with(format!("network reached state {state}"), network)
        }
        _ => Outcome::Pending,
    }
}
