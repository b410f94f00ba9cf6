//! Error taxonomy for NetsBlox cloud requests

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;

/// Message used when neither the body nor the status carry any text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred. Please try again later.";

/// Discriminant of [`ClientError`], for callers that only need to branch on
/// the class of failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConnectionRefused,
    Request,
    MissingCredential,
    Decode,
    InvalidUrl,
    InvalidHeader,
    NotLoggedIn,
    NoRoom,
    Transport,
}

/// Every failure a [`Session`](crate::Session) call can produce.
///
/// Cheap to clone so a single failure can be handed to every caller that
/// awaits a shared operation.
#[derive(Clone, Debug, Error)]
pub enum ClientError {
    /// The host could not be reached at all (DNS, refused, timeout).
    #[error("Unable to connect to {url}")]
    ConnectionRefused { url: String },

    /// The server answered with a status outside 200-299.
    #[error("{status}: {message}")]
    Request { status: u16, message: String },

    /// Login succeeded but no session cookie came back.
    #[error("No session cookie received")]
    MissingCredential,

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid value for header '{name}'")]
    InvalidHeader { name: &'static str },

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("No project is currently open")]
    NoRoom,

    #[error(transparent)]
    Transport(Arc<reqwest::Error>),
}

impl ClientError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionRefused { .. } => ErrorKind::ConnectionRefused,
            Self::Request { .. } => ErrorKind::Request,
            Self::MissingCredential => ErrorKind::MissingCredential,
            Self::Decode(_) => ErrorKind::Decode,
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::InvalidHeader { .. } => ErrorKind::InvalidHeader,
            Self::NotLoggedIn => ErrorKind::NotLoggedIn,
            Self::NoRoom => ErrorKind::NoRoom,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// HTTP status of a [`ClientError::Request`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the request for lack of authentication.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Whether the server no longer recognises the session (401).
    ///
    /// Unlike a 403, which denies one resource, this invalidates the
    /// stored identity.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        self.status() == Some(401)
    }

    /// Builds a [`ClientError::Request`] from a failed response.
    ///
    /// The body text wins when non-empty, then the status' reason phrase,
    /// then [`UNKNOWN_ERROR_MESSAGE`].
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);

        let message = if !text.is_empty() {
            text.into_owned()
        } else if let Some(reason) = status.canonical_reason() {
            reason.to_owned()
        } else {
            UNKNOWN_ERROR_MESSAGE.to_owned()
        };

        Self::Request {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(Arc::new(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Arc::new(err))
    }
}

pub type Result<T, E = ClientError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefers_body_text() {
        let err = ClientError::from_response(StatusCode::UNAUTHORIZED, b"Invalid credentials");

        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
        assert!(err.is_unauthenticated());
        match err {
            ClientError::Request { message, .. } => assert_eq!(message, "Invalid credentials"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn message_falls_back_to_reason_phrase() {
        let err = ClientError::from_response(StatusCode::NOT_FOUND, b"");

        assert_eq!(err.to_string(), "404: Not Found");
    }

    #[test]
    fn message_falls_back_to_generic_text() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = ClientError::from_response(status, b"");

        assert_eq!(err.to_string(), format!("599: {UNKNOWN_ERROR_MESSAGE}"));
    }

    #[test]
    fn kind_tags_each_variant() {
        let refused = ClientError::ConnectionRefused {
            url: "http://localhost:1".to_owned(),
        };

        assert_eq!(refused.kind(), ErrorKind::ConnectionRefused);
        assert_eq!(refused.status(), None);
        assert_eq!(refused.to_string(), "Unable to connect to http://localhost:1");
        assert_eq!(ClientError::MissingCredential.kind(), ErrorKind::MissingCredential);
    }
}
