//! Session and transport configuration

use core::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::{PasswordHashing, SESSION_COOKIE};
use crate::errors::{ClientError, Result};

/// Configuration of a [`Session`](crate::Session).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL of the cloud, e.g. `https://cloud.netsblox.org`.
    pub url: Url,

    /// Client id assigned by the server (see `GET /configuration`).
    #[serde(default)]
    pub client_id: Option<String>,

    /// Whether the transport keeps its own cookie jar, like a browser does.
    ///
    /// When `false` the session cookie is read from responses and replayed
    /// by hand on every request.
    #[serde(default)]
    pub supports_ambient_cookies: bool,

    #[serde(default)]
    pub password_hashing: PasswordHashing,

    #[serde(
        default,
        rename = "request_timeout_ms",
        with = "serde_duration_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_timeout: Option<Duration>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl SessionConfig {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client_id: None,
            supports_ambient_cookies: false,
            password_hashing: PasswordHashing::default(),
            request_timeout: None,
            user_agent: default_user_agent(),
            cookie_name: default_cookie_name(),
        }
    }

    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|source| ClientError::InvalidUrl {
            url: url.to_owned(),
            source,
        })?;

        Ok(Self::new(parsed))
    }

    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    #[must_use]
    pub const fn with_ambient_cookies(mut self, supported: bool) -> Self {
        self.supports_ambient_cookies = supported;
        self
    }

    #[must_use]
    pub const fn with_password_hashing(mut self, hashing: PasswordHashing) -> Self {
        self.password_hashing = hashing;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            base_url: self.url.clone(),
            supports_ambient_cookies: self.supports_ambient_cookies,
            timeout: self.request_timeout,
            user_agent: self.user_agent.clone(),
            cookie_name: self.cookie_name.clone(),
        }
    }
}

/// What a [`Transport`](crate::transport::Transport) needs to know about its
/// environment.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    pub base_url: Url,
    pub supports_ambient_cookies: bool,
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub cookie_name: String,
}

impl TransportConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        SessionConfig::new(base_url).transport()
    }

    /// Resolves `path` against the base URL.
    ///
    /// Absolute `http(s)://` paths are used as-is. Anything else is appended
    /// to the base URL verbatim, so a base path prefix and the query string
    /// are both preserved.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else {
            let base = self.base_url.as_str().trim_end_matches('/');
            let separator = if path.starts_with('/') { "" } else { "/" };
            format!("{base}{separator}{path}")
        };

        Url::parse(&raw).map_err(|source| ClientError::InvalidUrl { url: raw, source })
    }
}

fn default_user_agent() -> String {
    concat!("netsblox-client/", env!("CARGO_PKG_VERSION")).to_owned()
}

fn default_cookie_name() -> String {
    SESSION_COOKIE.to_owned()
}

mod serde_duration_opt {
    use core::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(duration) => {
                serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> TransportConfig {
        TransportConfig::new(Url::parse(base).unwrap())
    }

    #[test]
    fn resolves_relative_paths_onto_base() {
        let config = transport("http://127.0.0.1:7777/");

        assert_eq!(
            config.resolve("/users/whoami").unwrap().as_str(),
            "http://127.0.0.1:7777/users/whoami"
        );
    }

    #[test]
    fn keeps_base_prefix_and_query() {
        let config = transport("https://example.org/cloud");

        assert_eq!(
            config.resolve("/users/logout?clientId=_abc").unwrap().as_str(),
            "https://example.org/cloud/users/logout?clientId=_abc"
        );
    }

    #[test]
    fn absolute_paths_bypass_base() {
        let config = transport("http://127.0.0.1:7777");

        assert_eq!(
            config.resolve("https://other.host/x").unwrap().as_str(),
            "https://other.host/x"
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: SessionConfig = serde_json::from_str(
            r#"{"url": "http://localhost:7777", "request_timeout_ms": 2500}"#,
        )
        .unwrap();

        assert!(!config.supports_ambient_cookies);
        assert_eq!(config.password_hashing, PasswordHashing::Sha512);
        assert_eq!(config.request_timeout, Some(Duration::from_millis(2500)));
        assert_eq!(config.cookie_name, "netsblox");
    }
}
