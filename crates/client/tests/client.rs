//! Resource methods: paths, defaults and the errors they raise locally.

mod common;

use common::{config, mount_login, session};
use netsblox_client::{Client, ClientError, ErrorKind, Session};
use netsblox_primitives::friends::FriendLinkState;
use netsblox_primitives::projects::{ProjectId, PublishState, RoleId};
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn logged_in(server: &MockServer) -> Client {
    mount_login(server, "admin", Some("abc123")).await;

    let session = session(server);
    let _username = session.login("admin", "pw").await.unwrap();

    Client::new(session)
}

#[tokio::test]
async fn user_scoped_listings_default_to_current_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/user/admin"))
        .and(header("cookie", "netsblox=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "p1",
            "owner": "admin",
            "name": "Pong",
            "roles": {"r1": {"name": "player", "code": "c", "media": "m"}},
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in(&server).await;

    let projects = client.list_user_projects(None).await.unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Pong");
    assert_eq!(projects[0].state, PublishState::Private);
}

#[tokio::test]
async fn user_scoped_calls_need_a_login() {
    let server = MockServer::start().await;
    let client = Client::new(session(&server));

    let err = client.list_friends().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotLoggedIn);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn room_scoped_calls_need_a_room() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    let err = client.get_room_state().await.unwrap_err();

    assert!(matches!(err, ClientError::NoRoom));
}

#[tokio::test]
async fn path_segments_are_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/libraries/user/admin/my%20blocks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<blocks/>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in(&server).await;

    let blocks = client.get_user_library("admin", "my blocks").await.unwrap();

    assert_eq!(blocks, "<blocks/>");
}

#[tokio::test]
async fn friend_actions_post_to_the_current_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/friends/admin/unfriend/bob"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/friends/admin/invites/carol"))
        .and(body_json(json!("Approved")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in(&server).await;

    client.unfriend(" bob ").await.unwrap();
    client
        .respond_to_friend_invite("carol", FriendLinkState::Approved)
        .await
        .unwrap();
}

#[tokio::test]
async fn get_role_moves_into_the_room() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/id/p1/r2/latest"))
        .and(query_param("clientId", "_c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "player",
            "code": "<project/>",
            "media": "<media/>",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/network/id/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1",
            "owner": "admin",
            "name": "Pong",
            "roles": {"r2": {"name": "player", "occupants": [{"id": "_c1", "name": "admin"}]}},
            "collaborators": [],
            "version": 3,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(config(&server).with_client_id("_c1")).unwrap();
    let client = Client::new(session);

    let role = client
        .get_role(&ProjectId::from("p1"), &RoleId::from("r2"))
        .await
        .unwrap();
    assert_eq!(role.name, "player");

    let state = client.get_room_state().await.unwrap();
    assert_eq!(state.version, 3);
    assert_eq!(state.roles[&RoleId::from("r2")].occupants[0].name, "admin");
}

#[tokio::test]
async fn service_settings_are_sent_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/settings/user/admin/https%3A%2F%2Fsvc.example"))
        .and(body_string("apiKey=123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in(&server).await;

    client
        .set_user_settings("https://svc.example", "apiKey=123")
        .await
        .unwrap();
}

#[tokio::test]
async fn decode_failures_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/public/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = logged_in(&server).await;

    let err = client.list_public_projects().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn unreachable_cloud_is_connection_refused() {
    let session = Session::new(
        netsblox_client::SessionConfig::parse("http://127.0.0.1:1").unwrap(),
    )
    .unwrap();

    let err = session.get("/users/whoami").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConnectionRefused);
    assert_eq!(
        err.to_string(),
        "Unable to connect to http://127.0.0.1:1/users/whoami"
    );
    assert!(!session.check_login().await);
}
