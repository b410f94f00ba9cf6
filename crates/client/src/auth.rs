//! Credentials and the headers that carry them

use core::fmt;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::errors::{ClientError, Result};

/// Name of the cookie the cloud uses for its session token.
pub const SESSION_COOKIE: &str = "netsblox";

/// Header through which service hosts authenticate.
pub const HOST_AUTHORIZATION: &str = "x-authorization";

/// Proof of an authenticated session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Credential {
    /// Session token issued through the `netsblox` cookie.
    Token { token: String },
    /// Id/secret pair issued to an authorized service host.
    Host { id: String, secret: String },
}

impl Credential {
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token {
            token: token.into(),
        }
    }

    pub fn host(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::Host {
            id: id.into(),
            secret: secret.into(),
        }
    }

    #[must_use]
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token { token } => Some(token),
            Self::Host { .. } => None,
        }
    }

    /// Adds the headers presenting this credential to `headers`.
    ///
    /// Tokens travel as a `cookie` header, which is skipped when the
    /// transport keeps its own cookie jar. Host credentials are always sent.
    pub fn inject(
        &self,
        headers: &mut HeaderMap,
        cookie_name: &str,
        ambient_cookies: bool,
    ) -> Result<()> {
        match self {
            Self::Token { .. } if ambient_cookies => {}
            Self::Token { token } => {
                let value = HeaderValue::from_str(&format!("{cookie_name}={token}"))
                    .map_err(|_| ClientError::InvalidHeader { name: "cookie" })?;
                let _previous = headers.insert(COOKIE, value);
            }
            Self::Host { id, secret } => {
                let value = HeaderValue::from_str(&format!("{id}:{secret}")).map_err(|_| {
                    ClientError::InvalidHeader {
                        name: HOST_AUTHORIZATION,
                    }
                })?;
                let _previous = headers.insert(HOST_AUTHORIZATION, value);
            }
        }

        Ok(())
    }
}

// Keeps secrets out of logs and panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { .. } => f.debug_struct("Token").finish_non_exhaustive(),
            Self::Host { id, .. } => f
                .debug_struct("Host")
                .field("id", id)
                .finish_non_exhaustive(),
        }
    }
}

/// Finds the value of the `cookie_name` cookie among `Set-Cookie` headers.
///
/// When several headers set it, the last one wins. An empty value (the
/// server expiring the cookie) is not a credential.
#[must_use]
pub fn session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| {
            let pair = value.split(';').next()?;
            let (name, token) = pair.split_once('=')?;
            (name.trim() == cookie_name).then(|| token.trim())
        })
        .last()
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

/// How secrets are transformed before they leave the client.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordHashing {
    /// Lowercase hex SHA-512 digest of the secret.
    #[default]
    Sha512,
    /// Send the secret unchanged.
    Plain,
}

impl PasswordHashing {
    #[must_use]
    pub fn apply(self, password: &str) -> String {
        match self {
            Self::Sha512 => hex::encode(Sha512::digest(password.as_bytes())),
            Self::Plain => password.to_owned(),
        }
    }
}
