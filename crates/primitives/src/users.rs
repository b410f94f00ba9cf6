use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::services::ServiceHost;

/// Strategy name used by the built-in NetsBlox account provider.
pub const DEFAULT_STRATEGY: &str = "NetsBlox";

/// Username/secret pair for a single login strategy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrategyCredentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /users/login`.
///
/// Serializes as `{"credentials": {"<strategy>": {...}}, "clientId": ...}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub credentials: BTreeMap<String, StrategyCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl LoginRequest {
    pub fn new(strategy: &str, credentials: StrategyCredentials, client_id: Option<String>) -> Self {
        Self {
            credentials: BTreeMap::from([(strategy.to_owned(), credentials)]),
            client_id,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub username: String,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Response of `GET /configuration`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfiguration {
    pub client_id: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[default]
    User,
    Teacher,
    Moderator,
    Admin,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkedAccount {
    pub username: String,
    pub strategy: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub linked_accounts: Vec<LinkedAccount>,
    #[serde(default)]
    pub services_hosts: Option<Vec<ServiceHost>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}
