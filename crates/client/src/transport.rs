//! Single-request HTTP execution and outcome classification

use core::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::session_cookie;
use crate::config::TransportConfig;
use crate::errors::{ClientError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

#[derive(Debug)]
pub struct TransportRequest<'a> {
    pub method: Method,
    /// Base-relative (`/users/whoami`) or absolute URL.
    pub path: &'a str,
    pub headers: HeaderMap,
    /// Pre-serialized body, usually JSON.
    pub body: Option<String>,
}

impl<'a> TransportRequest<'a> {
    #[must_use]
    pub fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A successful (2xx) response, fully buffered.
#[derive(Clone, Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    credential: Option<String>,
}

impl Response {
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            credential: None,
        }
    }

    /// Attaches the session token this response carried.
    #[must_use]
    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Session token found in the response, if the transport looked for one.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    /// Body as a plain string, unwrapping it if the server sent a JSON string.
    #[must_use]
    pub fn text_or_json_string(&self) -> String {
        serde_json::from_slice::<String>(&self.body).unwrap_or_else(|_| self.text())
    }
}

/// Executes one HTTP request and classifies the outcome.
///
/// Implementations must fail with [`ClientError::ConnectionRefused`] when
/// the host cannot be reached and with [`ClientError::Request`] for any
/// status outside 200-299.
#[async_trait]
pub trait Transport: Send + Sync {
    fn config(&self) -> &TransportConfig;

    async fn execute(&self, request: TransportRequest<'_>) -> Result<Response>;

    /// Forgets any cookies the transport persisted on its own.
    fn clear_cookies(&self) {}
}

/// [`Transport`] backed by `reqwest`.
///
/// With ambient cookies enabled the underlying client keeps a cookie jar,
/// otherwise the session cookie is surfaced through
/// [`Response::credential`].
#[derive(Debug)]
pub struct HttpTransport {
    config: TransportConfig,
    client: RwLock<Client>,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let client = build_client(&config)?;

        Ok(Self {
            config,
            client: RwLock::new(client),
        })
    }
}

fn build_client(config: &TransportConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .cookie_store(config.supports_ambient_cookies);

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(Into::into)
}

#[async_trait]
impl Transport for HttpTransport {
    fn config(&self) -> &TransportConfig {
        &self.config
    }

    async fn execute(&self, request: TransportRequest<'_>) -> Result<Response> {
        let url = self.config.resolve(request.path)?;

        let mut headers = request.headers;
        if !headers.contains_key(CONTENT_TYPE) {
            let _previous =
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let client = self.client.read().clone();
        let mut builder = client
            .request(request.method.into(), url.clone())
            .headers(headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        debug!(method = %request.method, %url, "Dispatching request");

        let response = builder.send().await.map_err(|err| {
            if err.is_builder() {
                ClientError::from(err)
            } else {
                debug!(%url, error = %err, "Request did not reach the server");
                ClientError::ConnectionRefused {
                    url: url.to_string(),
                }
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        if !status.is_success() {
            debug!(%url, %status, "Request rejected by the server");
            return Err(ClientError::from_response(status, &body));
        }

        let credential = if self.config.supports_ambient_cookies {
            None
        } else {
            session_cookie(&headers, &self.config.cookie_name)
        };

        Ok(Response::new(status, headers, body).with_credential(credential))
    }

    fn clear_cookies(&self) {
        if !self.config.supports_ambient_cookies {
            return;
        }

        match build_client(&self.config) {
            Ok(client) => *self.client.write() = client,
            Err(err) => warn!(error = %err, "Failed to reset the cookie jar"),
        }
    }
}
