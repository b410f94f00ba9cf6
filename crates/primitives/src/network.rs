use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::projects::{ProjectId, RoleId};

/// Where a browser client currently sits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserClientState {
    pub project_id: ProjectId,
    pub role_id: RoleId,
}

/// Address of a client that lives outside the NetsBlox editor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalClientState {
    pub address: String,
    pub app_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ClientState {
    Browser(BrowserClientState),
    External(ExternalClientState),
}

/// Body of `POST /network/<clientId>/state`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientStateData {
    pub state: ClientState,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OccupantState {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleState {
    pub name: String,
    #[serde(default)]
    pub occupants: Vec<OccupantState>,
}

/// Server's view of a room: who occupies which role.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomState {
    pub id: ProjectId,
    pub owner: String,
    pub name: String,
    pub roles: IndexMap<RoleId, RoleState>,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub version: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OccupantInvite {
    pub username: String,
    pub role_id: RoleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTraceMetadata {
    pub id: String,
    #[serde(default)]
    pub start_time: Option<Value>,
    #[serde(default)]
    pub end_time: Option<Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn browser_state_nests_under_browser_key() {
        let data = ClientStateData {
            state: ClientState::Browser(BrowserClientState {
                project_id: ProjectId::from("p1"),
                role_id: RoleId::from("r1"),
            }),
        };

        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"state": {"browser": {"projectId": "p1", "roleId": "r1"}}})
        );
    }
}
