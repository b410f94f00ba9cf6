//! Identity and credential state shared by every request
//!
//! A [`Session`] remembers who is logged in and which credential proves it,
//! injects that credential into every outgoing request and picks up any
//! fresh credential the server hands back. It also tracks the project and
//! role the client currently occupies, which scopes the room-level calls of
//! [`Client`](crate::Client).

use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use netsblox_primitives::network::{BrowserClientState, ClientState, ClientStateData};
use netsblox_primitives::projects::{
    CreateProjectData, ProjectId, ProjectMetadata, RenameData, RoleId,
};
use netsblox_primitives::users::{
    LoginRequest, LoginResponse, ServerConfiguration, StrategyCredentials, DEFAULT_STRATEGY,
};
use parking_lot::{Mutex, RwLock};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::auth::{Credential, PasswordHashing};
use crate::config::SessionConfig;
use crate::errors::{ClientError, Result};
use crate::transport::{HttpTransport, Method, Response, Transport, TransportRequest};

/// The project and role a client currently occupies.
///
/// Advisory only: the server holds the authoritative room membership.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    pub project_id: ProjectId,
    pub role_id: RoleId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Snapshot of what a session knows about its client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSnapshot {
    pub username: Option<String>,
    pub client_id: Option<String>,
    pub project_id: Option<ProjectId>,
    pub role_id: Option<RoleId>,
}

#[derive(Clone, Debug, Default)]
struct SessionState {
    username: Option<String>,
    group_id: Option<String>,
    client_id: Option<String>,
    credential: Option<Credential>,
    room: Option<RoomRef>,
}

/// Observes every error a session call produces before it is returned.
pub trait ErrorHook: Send + Sync {
    fn on_error(&self, error: &ClientError);
}

/// Default hook: reports the error through `tracing`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogErrors;

impl ErrorHook for LogErrors {
    fn on_error(&self, error: &ClientError) {
        error!(kind = ?error.kind(), "{error}");
    }
}

impl<F> ErrorHook for F
where
    F: Fn(&ClientError) + Send + Sync,
{
    fn on_error(&self, error: &ClientError) {
        self(error);
    }
}

type PendingProject = Shared<BoxFuture<'static, Result<ProjectMetadata>>>;

struct Inner<T> {
    transport: T,
    password_hashing: PasswordHashing,
    state: RwLock<SessionState>,
    pending_project: Mutex<Option<PendingProject>>,
    logins_in_flight: AtomicUsize,
    error_hook: RwLock<Arc<dyn ErrorHook>>,
}

/// Authenticated handle onto the cloud.
///
/// Cloning is cheap and every clone shares the same identity, credential
/// and room state.
pub struct Session<T = HttpTransport> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Session<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("Session")
            .field("username", &state.username)
            .field("client_id", &state.client_id)
            .field("room", &state.room)
            .finish_non_exhaustive()
    }
}

impl Session<HttpTransport> {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.transport())?;

        Ok(Self::with_transport(transport, &config))
    }

    /// Creates a session and asks the server for a client id and any
    /// identity it already associates with this client.
    pub async fn connect(config: SessionConfig) -> Result<Self> {
        let session = Self::new(config)?;
        session.load_configuration().await?;

        Ok(session)
    }
}

impl<T: Transport + 'static> Session<T> {
    pub fn with_transport(transport: T, config: &SessionConfig) -> Self {
        let state = SessionState {
            client_id: config.client_id.clone(),
            ..SessionState::default()
        };

        Self {
            inner: Arc::new(Inner {
                transport,
                password_hashing: config.password_hashing,
                state: RwLock::new(state),
                pending_project: Mutex::new(None),
                logins_in_flight: AtomicUsize::new(0),
                error_hook: RwLock::new(Arc::new(LogErrors)),
            }),
        }
    }

    /// Replaces the hook that observes every failed call.
    pub fn set_error_hook(&self, hook: impl ErrorHook + 'static) {
        *self.inner.error_hook.write() = Arc::new(hook);
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn username(&self) -> Option<String> {
        self.inner.state.read().username.clone()
    }

    pub fn group_id(&self) -> Option<String> {
        self.inner.state.read().group_id.clone()
    }

    pub fn client_id(&self) -> Option<String> {
        self.inner.state.read().client_id.clone()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.inner.state.read().credential.clone()
    }

    /// Restores a credential persisted by the caller.
    #[must_use]
    pub fn with_credential(self, credential: Credential) -> Self {
        self.set_credential(Some(credential));
        self
    }

    pub fn set_credential(&self, credential: Option<Credential>) {
        self.inner.state.write().credential = credential;
    }

    /// Records a known principal without contacting the server.
    pub fn set_username(&self, username: Option<String>) {
        self.inner.state.write().username = username;
    }

    pub fn phase(&self) -> AuthPhase {
        if self.inner.logins_in_flight.load(Ordering::SeqCst) > 0 {
            AuthPhase::Authenticating
        } else if self.inner.state.read().username.is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }

    pub fn client_state(&self) -> ClientSnapshot {
        let state = self.inner.state.read();
        ClientSnapshot {
            username: state.username.clone(),
            client_id: state.client_id.clone(),
            project_id: state.room.as_ref().map(|room| room.project_id.clone()),
            role_id: state.room.as_ref().map(|room| room.role_id.clone()),
        }
    }

    /// Forgets the principal and its credential.
    pub fn clear(&self) {
        {
            let mut state = self.inner.state.write();
            state.username = None;
            state.group_id = None;
            state.credential = None;
        }
        self.inner.transport.clear_cookies();
    }

    /// Fetches `/configuration` and adopts the client id and username the
    /// server assigns.
    pub async fn load_configuration(&self) -> Result<ServerConfiguration> {
        let configuration: ServerConfiguration = self
            .get("/configuration")
            .await?
            .json()
            .map_err(|err| self.report(err))?;

        {
            let mut state = self.inner.state.write();
            state.client_id = Some(configuration.client_id.clone());
            if configuration.username.is_some() {
                state.username.clone_from(&configuration.username);
            }
        }

        Ok(configuration)
    }

    pub(crate) fn password_hashing(&self) -> PasswordHashing {
        self.inner.password_hashing
    }

    pub(crate) fn require_username(&self) -> Result<String> {
        self.username()
            .ok_or_else(|| self.report(ClientError::NotLoggedIn))
    }

    // ---------------------------------------------------------------------
    // Verbs
    // ---------------------------------------------------------------------

    pub async fn get(&self, path: &str) -> Result<Response> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Response> {
        let body = self.encode(body)?;
        self.request(Method::Post, path, Some(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<Response> {
        self.request(Method::Post, path, None).await
    }

    pub async fn patch<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        let body = self.encode(body)?;
        self.request(Method::Patch, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.request(Method::Delete, path, None).await
    }

    /// Sends `body` as-is with the stored credential attached.
    ///
    /// Any error is handed to the error hook before it is returned.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<Response> {
        self.send(method, path, body, true).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        expire_on_rejection: bool,
    ) -> Result<Response> {
        self.dispatch(method, path, body).await.map_err(|err| {
            if expire_on_rejection {
                self.expire_if_rejected(&err);
            }
            self.report(err)
        })
    }

    /// Drops back to anonymous once the server stops recognising the
    /// held identity.
    fn expire_if_rejected(&self, err: &ClientError) {
        if !err.is_unauthenticated() {
            return;
        }

        let held = {
            let state = self.inner.state.read();
            state.username.is_some() || state.credential.is_some()
        };
        if held {
            warn!("Session rejected by the server, clearing local identity");
            self.clear();
        }
    }

    async fn dispatch(&self, method: Method, path: &str, body: Option<String>) -> Result<Response> {
        let config = self.inner.transport.config();

        let mut headers = HeaderMap::new();
        if let Some(credential) = self.credential() {
            credential.inject(
                &mut headers,
                &config.cookie_name,
                config.supports_ambient_cookies,
            )?;
        }

        let request = TransportRequest {
            method,
            path,
            headers,
            body,
        };

        let response = self.inner.transport.execute(request).await?;

        if let Some(token) = response.credential() {
            debug!(%method, path, "Session credential refreshed");
            self.inner.state.write().credential = Some(Credential::token(token));
        }

        Ok(response)
    }

    fn encode<B: Serialize + ?Sized>(&self, body: &B) -> Result<String> {
        serde_json::to_string(body).map_err(|err| self.report(err.into()))
    }

    pub(crate) fn report(&self, err: ClientError) -> ClientError {
        let hook = Arc::clone(&self.inner.error_hook.read());
        hook.on_error(&err);
        err
    }

    // ---------------------------------------------------------------------
    // Identity
    // ---------------------------------------------------------------------

    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        self.login_with_strategy(username, password, DEFAULT_STRATEGY)
            .await
    }

    /// Logs in through the named strategy and returns the principal name.
    ///
    /// Without ambient cookies the response must carry a session cookie,
    /// otherwise this fails with [`ClientError::MissingCredential`]. The
    /// identity is left untouched on any failure.
    pub async fn login_with_strategy(
        &self,
        username: &str,
        password: &str,
        strategy: &str,
    ) -> Result<String> {
        let _guard = LoginGuard::enter(&self.inner.logins_in_flight);

        let credentials = StrategyCredentials {
            username: username.to_owned(),
            password: self.inner.password_hashing.apply(password),
        };
        let body = LoginRequest::new(strategy, credentials, self.client_id());

        // A rejected login leaves any existing identity in place.
        let body = self.encode(&body)?;
        let response = self
            .send(Method::Post, "/users/login", Some(body), false)
            .await?;

        let ambient = self.inner.transport.config().supports_ambient_cookies;
        if !ambient && response.credential().is_none() {
            return Err(self.report(ClientError::MissingCredential));
        }

        let principal = login_principal(&response);
        debug!(username = %principal.username, "Logged in");

        {
            let mut state = self.inner.state.write();
            state.username = Some(principal.username.clone());
            state.group_id = principal.group_id;
        }

        Ok(principal.username)
    }

    /// Ends the session on the server, then locally.
    ///
    /// Local identity and credential are cleared even if the server call
    /// fails; that failure is still returned.
    pub async fn logout(&self) -> Result<()> {
        let path = match self.client_id() {
            Some(client_id) => format!(
                "/users/logout?clientId={}",
                urlencoding::encode(&client_id)
            ),
            None => "/users/logout".to_owned(),
        };

        let result = self.post_empty(&path).await;
        self.clear();

        if let Err(err) = &result {
            warn!(error = %err, "Server-side logout failed, local session cleared");
        }

        result.map(drop)
    }

    /// Asks the server who this session belongs to.
    pub async fn whoami(&self) -> Result<String> {
        let username = self.get("/users/whoami").await?.text_or_json_string();
        self.inner.state.write().username = Some(username.clone());

        Ok(username)
    }

    /// `true` if the server recognises this session, `false` on any failure.
    pub async fn check_login(&self) -> bool {
        self.whoami().await.is_ok()
    }

    // ---------------------------------------------------------------------
    // Room state
    // ---------------------------------------------------------------------

    /// The current room as last recorded locally, without waiting.
    pub fn room(&self) -> Option<RoomRef> {
        self.inner.state.read().room.clone()
    }

    /// The current room once any pending project creation has settled.
    pub async fn current_room(&self) -> Option<RoomRef> {
        self.settle_pending_project().await;
        self.room()
    }

    pub(crate) async fn require_room(&self) -> Result<RoomRef> {
        self.current_room()
            .await
            .ok_or_else(|| self.report(ClientError::NoRoom))
    }

    pub fn set_local_state(&self, room: Option<RoomRef>) {
        self.inner.state.write().room = room;
    }

    pub fn reset_local_state(&self) {
        self.set_local_state(None);
    }

    /// Moves this client into `project_id`/`role_id` and tells the server.
    ///
    /// Waits for an in-flight [`Session::new_project`] first so the move is
    /// not overwritten by the creation finishing later.
    pub async fn set_client_state(&self, project_id: ProjectId, role_id: RoleId) -> Result<()> {
        self.settle_pending_project().await;

        let room = RoomRef {
            project_id,
            role_id,
        };
        self.set_local_state(Some(room.clone()));

        self.report_client_state(&room).await
    }

    /// Renames the current project once any pending creation has settled.
    pub async fn set_project_name(&self, name: &str) -> Result<()> {
        let room = self.require_room().await?;

        let body = RenameData {
            name: name.to_owned(),
            client_id: self.client_id(),
        };
        let path = format!(
            "/projects/id/{}",
            urlencoding::encode(room.project_id.as_str())
        );
        let _response = self.patch(&path, &body).await?;

        Ok(())
    }

    async fn report_client_state(&self, room: &RoomRef) -> Result<()> {
        let Some(client_id) = self.client_id() else {
            debug!("No client id, skipping client state report");
            return Ok(());
        };

        let body = ClientStateData {
            state: ClientState::Browser(BrowserClientState {
                project_id: room.project_id.clone(),
                role_id: room.role_id.clone(),
            }),
        };

        let path = format!("/network/{}/state", urlencoding::encode(&client_id));
        let _response = self.post(&path, &body).await?;

        Ok(())
    }

    /// Creates a new project and makes it the current room.
    ///
    /// Only one creation runs at a time: calling this again while a
    /// creation is outstanding awaits that same creation instead of issuing
    /// another request. On failure the current room is reset.
    pub async fn new_project(&self, name: &str) -> Result<ProjectMetadata> {
        let pending = {
            let mut slot = self.inner.pending_project.lock();
            if let Some(pending) = slot.as_ref() {
                debug!("Joining in-flight project creation");
                pending.clone()
            } else {
                let data = CreateProjectData {
                    name: name.to_owned(),
                    client_id: self.client_id(),
                    ..CreateProjectData::default()
                };
                let session = self.clone();
                let pending = async move { session.create_project(data).await }
                    .boxed()
                    .shared();
                *slot = Some(pending.clone());
                pending
            }
        };

        pending.await
    }

    async fn create_project(self, data: CreateProjectData) -> Result<ProjectMetadata> {
        let result = match self.post("/projects/", &data).await {
            Ok(response) => response
                .json::<ProjectMetadata>()
                .map_err(|err| self.report(err)),
            Err(err) => Err(err),
        };

        match &result {
            Ok(metadata) => {
                if let Some(role_id) = metadata.first_role() {
                    let room = RoomRef {
                        project_id: metadata.id.clone(),
                        role_id: role_id.clone(),
                    };
                    self.set_local_state(Some(room.clone()));

                    if let Err(err) = self.report_client_state(&room).await {
                        warn!(error = %err, "Failed to report the new project to the network");
                    }
                } else {
                    self.reset_local_state();
                }
            }
            Err(_) => self.reset_local_state(),
        }

        *self.inner.pending_project.lock() = None;

        result
    }

    /// Whether a project creation is currently outstanding.
    pub fn is_creating_project(&self) -> bool {
        self.inner.pending_project.lock().is_some()
    }

    pub(crate) async fn settle_pending_project(&self) {
        let pending = self.inner.pending_project.lock().clone();
        if let Some(pending) = pending {
            let _outcome = pending.await;
        }
    }
}

/// Principal from a login response: `{username, groupId}` JSON, or the bare
/// username as older servers send it.
fn login_principal(response: &Response) -> LoginResponse {
    response
        .json::<LoginResponse>()
        .unwrap_or_else(|_| LoginResponse {
            username: response.text_or_json_string(),
            group_id: None,
        })
}

struct LoginGuard<'a>(&'a AtomicUsize);

impl<'a> LoginGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        let _previous = counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoginGuard<'_> {
    fn drop(&mut self) {
        let _previous = self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use async_trait::async_trait;
    use bytes::Bytes;
    use reqwest::header::{HeaderValue, COOKIE, SET_COOKIE};
    use reqwest::StatusCode;

    use super::*;
    use crate::config::TransportConfig;

    /// Answers every request with a canned outcome and records the cookie
    /// header it saw.
    struct Canned {
        config: TransportConfig,
        outcome: Mutex<Result<(u16, &'static str, Option<&'static str>)>>,
        seen_cookie: Mutex<Option<String>>,
    }

    impl Canned {
        fn new(outcome: Result<(u16, &'static str, Option<&'static str>)>) -> Self {
            let config = SessionConfig::parse("http://cloud.test").unwrap();
            Self {
                config: config.transport(),
                outcome: Mutex::new(outcome),
                seen_cookie: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Transport for Canned {
        fn config(&self) -> &TransportConfig {
            &self.config
        }

        async fn execute(&self, request: TransportRequest<'_>) -> Result<Response> {
            *self.seen_cookie.lock() = request
                .headers
                .get(COOKIE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let (status, body, cookie) = self.outcome.lock().clone()?;
            let status = StatusCode::from_u16(status).unwrap();
            if !status.is_success() {
                return Err(ClientError::from_response(status, body.as_bytes()));
            }

            let mut headers = HeaderMap::new();
            if let Some(cookie) = cookie {
                let _previous = headers.insert(SET_COOKIE, HeaderValue::from_static(cookie));
            }
            let credential = crate::auth::session_cookie(&headers, &self.config.cookie_name);

            Ok(Response::new(status, headers, Bytes::from(body)).with_credential(credential))
        }
    }

    fn session(outcome: Result<(u16, &'static str, Option<&'static str>)>) -> Session<Canned> {
        let config = SessionConfig::parse("http://cloud.test").unwrap();
        Session::with_transport(Canned::new(outcome), &config)
    }

    #[tokio::test]
    async fn login_without_cookie_is_missing_credential() {
        let session = session(Ok((200, r#"{"username":"admin","groupId":null}"#, None)));

        let err = session.login("admin", "pw").await.unwrap_err();

        assert!(matches!(err, ClientError::MissingCredential));
        assert_eq!(session.username(), None);
        assert_eq!(session.phase(), AuthPhase::Anonymous);
    }

    #[tokio::test]
    async fn login_accepts_plain_text_username() {
        let session = session(Ok((200, "admin", Some("netsblox=tok; Path=/"))));

        let username = session.login("admin", "pw").await.unwrap();

        assert_eq!(username, "admin");
        assert_eq!(session.phase(), AuthPhase::Authenticated);
        assert_eq!(
            session.credential().as_ref().and_then(Credential::as_token),
            Some("tok")
        );
    }

    #[tokio::test]
    async fn error_hook_sees_every_failure() {
        let session = session(Ok((403, "Forbidden", None)));
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        session.set_error_hook(move |err: &ClientError| {
            assert_eq!(err.status(), Some(403));
            flag.store(true, Ordering::SeqCst);
        });

        let err = session.get("/users/whoami").await.unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn stored_token_is_sent_as_cookie() {
        let session = session(Ok((200, "admin", None)));
        session.set_credential(Some(Credential::token("abc123")));

        let _response = session.get("/users/whoami").await.unwrap();

        assert_eq!(
            session.transport().seen_cookie.lock().as_deref(),
            Some("netsblox=abc123")
        );
    }

    #[tokio::test]
    async fn room_scoped_calls_need_a_room() {
        let session = session(Ok((200, "", None)));

        assert!(matches!(
            session.require_room().await,
            Err(ClientError::NoRoom)
        ));
        assert!(matches!(
            session.require_username(),
            Err(ClientError::NotLoggedIn)
        ));
    }
}
