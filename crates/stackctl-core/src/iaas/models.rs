//! Status models for the IaaS API (network areas and networks)

use serde::{Deserialize, Serialize};

use crate::state::lifecycle_state;

lifecycle_state! {
    /// Lifecycle state of an organization's network area
    NetworkAreaState {
        Creating => "CREATING",
        Created => "CREATED",
        Updating => "UPDATING",
        Updated => "UPDATED",
        Deleting => "DELETING",
        Deleted => "DELETED",
        Error => "ERROR",
        Failed => "FAILED",
    }
}

lifecycle_state! {
    /// Lifecycle state of a project network
    NetworkState {
        Creating => "CREATING",
        Created => "CREATED",
        Updating => "UPDATING",
        Deleting => "DELETING",
        Deleted => "DELETED",
        Error => "ERROR",
        Failed => "FAILED",
    }
}

impl NetworkAreaState {
    /// States that will not move on by themselves
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::Failed)
    }
}

impl NetworkState {
    /// States that will not move on by themselves
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::Failed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkArea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<NetworkAreaState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<NetworkState>,
}
