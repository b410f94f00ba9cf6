use serde::{Deserialize, Serialize};

use crate::services::ServiceHost;

/// A group (classroom) owned by a teacher account.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub services_hosts: Option<Vec<ServiceHost>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services_hosts: Option<Vec<ServiceHost>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateGroupData {
    pub name: String,
}
