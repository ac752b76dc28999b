//! Status models for the SKCF API
//!
//! Only the fields the wait handlers read are modelled.

use serde::{Deserialize, Serialize};

use crate::state::lifecycle_state;

lifecycle_state! {
    /// Aggregated lifecycle state of a cluster
    ClusterState {
        Healthy => "STATE_HEALTHY",
        Unhealthy => "STATE_UNHEALTHY",
        Failed => "STATE_FAILED",
        Deleting => "STATE_DELETING",
    }
}

lifecycle_state! {
    /// State of the SKCF service in a project
    ProjectState {
        Created => "STATE_CREATED",
        Deleting => "STATE_DELETING",
        Failed => "STATE_FAILED",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregated: Option<ClusterState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClusterStatus>,
}

impl Cluster {
    /// The aggregated state, if the API reported one
    pub fn aggregated_state(&self) -> Option<&ClusterState> {
        self.status.as_ref().and_then(|s| s.aggregated.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClustersResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Cluster>>,
}

impl ListClustersResponse {
    /// Returns true if a cluster with exactly this name is listed
    pub fn contains(&self, name: &str) -> bool {
        self.items
            .iter()
            .flatten()
            .any(|cluster| cluster.name.as_deref() == Some(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ProjectState>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cluster_state_wire_strings() {
        assert_eq!(ClusterState::from("STATE_HEALTHY"), ClusterState::Healthy);
        assert_eq!(ClusterState::Failed.as_str(), "STATE_FAILED");
        assert_eq!(
            ClusterState::from("STATE_RECONCILING"),
            ClusterState::Unknown("STATE_RECONCILING".to_string())
        );
        assert_eq!(
            String::from(ClusterState::Unknown("X".to_string())),
            "X".to_string()
        );
    }

    #[test]
    fn test_state_vocabularies_do_not_mix() {
        // STATE_CREATED is a project state, never a cluster one
        assert!(matches!(
            ClusterState::from("STATE_CREATED"),
            ClusterState::Unknown(_)
        ));
        assert!(matches!(
            ProjectState::from("STATE_HEALTHY"),
            ProjectState::Unknown(_)
        ));
    }

    #[test]
    fn test_cluster_deserialization() {
        let cluster: Cluster = serde_json::from_value(json!({
            "name": "cluster",
            "status": { "aggregated": "STATE_HEALTHY" },
            "kubernetes": { "version": "1.30" }
        }))
        .unwrap();

        assert_eq!(cluster.name.as_deref(), Some("cluster"));
        assert_eq!(cluster.aggregated_state(), Some(&ClusterState::Healthy));
    }

    #[test]
    fn test_cluster_without_status() {
        let cluster: Cluster = serde_json::from_value(json!({ "name": "cluster" })).unwrap();
        assert!(cluster.aggregated_state().is_none());
    }

    #[test]
    fn test_listing_contains() {
        let listing: ListClustersResponse = serde_json::from_value(json!({
            "items": [{ "name": "a" }, { "name": "b" }, {}]
        }))
        .unwrap();
        assert!(listing.contains("a"));
        assert!(listing.contains("b"));
        assert!(!listing.contains("c"));

        assert!(!ListClustersResponse::default().contains("a"));
    }

    #[test]
    fn test_project_serialization_round_trips_state() {
        let project = ProjectResponse {
            project_id: Some("pid".to_string()),
            state: Some(ProjectState::Created),
        };
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value, json!({ "projectId": "pid", "state": "STATE_CREATED" }));
    }
}
