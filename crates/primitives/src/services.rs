use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A services server a user or group has configured.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceHost {
    pub url: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A services server trusted to act on behalf of the cloud.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizedServiceHost {
    pub url: String,
    pub id: String,
    #[serde(default)]
    pub public: bool,
}

/// Settings visible to a service host for a given user.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceSettings {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub member: Option<String>,
    #[serde(default)]
    pub groups: BTreeMap<String, String>,
}
