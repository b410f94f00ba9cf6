//! Shared fixtures for the session tests

use netsblox_client::{Session, SessionConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn config(server: &MockServer) -> SessionConfig {
    SessionConfig::parse(&server.uri()).unwrap()
}

pub fn session(server: &MockServer) -> Session {
    Session::new(config(server)).unwrap()
}

/// Answers `POST /users/login` as the cloud does for `username`, optionally
/// issuing a `netsblox` session cookie.
pub async fn mount_login(server: &MockServer, username: &str, token: Option<&str>) {
    let mut response =
        ResponseTemplate::new(200).set_body_json(json!({"username": username, "groupId": null}));
    if let Some(token) = token {
        response = response.insert_header("set-cookie", format!("netsblox={token}; Path=/; HttpOnly"));
    }

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(response)
        .mount(server)
        .await;
}
