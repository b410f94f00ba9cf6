//! Single-flight project creation and the room state it drives.

mod common;

use core::time::Duration;

use common::{config, mount_login, session};
use netsblox_client::{RoomRef, Session};
use netsblox_primitives::projects::{ProjectId, RoleId};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn created_project() -> serde_json::Value {
    json!({
        "id": "p1",
        "owner": "admin",
        "name": "untitled",
        "state": "Private",
        "collaborators": [],
        "saveState": "Created",
        "roles": {
            "r1": {"name": "myRole", "code": "code-r1", "media": "media-r1"},
            "r2": {"name": "other", "code": "code-r2", "media": "media-r2"},
        },
    })
}

async fn mount_create(server: &MockServer, delay: Duration, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/projects/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(created_project())
                .set_delay(delay),
        )
        .expect(expected)
        .mount(server)
        .await;
}

fn room(project_id: &str, role_id: &str) -> RoomRef {
    RoomRef {
        project_id: ProjectId::from(project_id),
        role_id: RoleId::from(role_id),
    }
}

#[tokio::test]
async fn concurrent_creations_share_one_request() {
    let server = MockServer::start().await;
    mount_create(&server, Duration::from_millis(200), 1).await;

    let session = session(&server);

    let (first, second) = tokio::join!(
        session.new_project("untitled"),
        session.new_project("untitled")
    );

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.id, ProjectId::from("p1"));
    assert_eq!(session.room(), Some(room("p1", "r1")));
    assert!(!session.is_creating_project());
}

#[tokio::test]
async fn creation_reports_client_state_when_client_id_known() {
    let server = MockServer::start().await;
    mount_login(&server, "admin", Some("abc123")).await;
    mount_create(&server, Duration::ZERO, 1).await;

    Mock::given(method("POST"))
        .and(path("/network/_c1/state"))
        .and(body_json(json!({
            "state": {"browser": {"projectId": "p1", "roleId": "r1"}}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(config(&server).with_client_id("_c1")).unwrap();
    let _username = session.login("admin", "pw").await.unwrap();

    let metadata = session.new_project("untitled").await.unwrap();

    assert_eq!(metadata.first_role(), Some(&RoleId::from("r1")));
    assert_eq!(session.current_room().await, Some(room("p1", "r1")));
}

#[tokio::test]
async fn client_state_waits_for_pending_creation() {
    let server = MockServer::start().await;
    mount_create(&server, Duration::from_millis(200), 1).await;

    Mock::given(method("POST"))
        .and(path("/network/_c1/state"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let session = Session::new(config(&server).with_client_id("_c1")).unwrap();

    let (created, moved) = tokio::join!(
        session.new_project("untitled"),
        session.set_client_state(ProjectId::from("p9"), RoleId::from("r9"))
    );

    let _metadata = created.unwrap();
    moved.unwrap();
    assert_eq!(session.room(), Some(room("p9", "r9")));
}

#[tokio::test]
async fn project_name_waits_for_pending_creation() {
    let server = MockServer::start().await;
    mount_create(&server, Duration::from_millis(200), 1).await;

    Mock::given(method("PATCH"))
        .and(path("/projects/id/p1"))
        .and(body_json(json!({"name": "renamed"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = session(&server);

    let (created, renamed) = tokio::join!(
        session.new_project("untitled"),
        session.set_project_name("renamed")
    );

    let _metadata = created.unwrap();
    renamed.unwrap();
}

#[tokio::test]
async fn failed_creation_resets_room() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Storage unavailable"))
        .expect(2)
        .mount(&server)
        .await;

    let session = session(&server);
    session.set_local_state(Some(room("old", "r0")));

    let err = session.new_project("untitled").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(session.room(), None);
    assert!(!session.is_creating_project());

    // The slot is cleared, so a retry issues a new request.
    let _err = session.new_project("untitled").await.unwrap_err();
}
