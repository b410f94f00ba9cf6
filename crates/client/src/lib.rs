//! NetsBlox Cloud Client
//!
//! A session-aware client for the NetsBlox cloud REST API.
//!
//! The core of the crate is the [`Session`]: it remembers the logged in
//! principal and the credential proving it, injects that credential into
//! every request and captures fresh credentials from responses. Requests are
//! executed through a [`Transport`], by default [`HttpTransport`] on top of
//! `reqwest`.
//!
//! ## Cookie environments
//!
//! - With `supports_ambient_cookies` the transport keeps a cookie jar and
//!   the session never touches the `netsblox` cookie itself.
//! - Without it (the default) the session token is read from `Set-Cookie`
//!   and replayed as a `cookie` header on every later request.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netsblox_client::{Client, Session, SessionConfig};
//!
//! # async fn run() -> netsblox_client::Result<()> {
//! let config = SessionConfig::parse("https://cloud.netsblox.org")?;
//! let session = Session::connect(config).await?;
//!
//! let _username = session.login("admin", "secret").await?;
//! let client = Client::new(session.clone());
//! for project in client.list_user_projects(None).await? {
//!     println!("{}", project.name);
//! }
//!
//! session.logout().await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod session;
pub mod transport;

pub use auth::{Credential, PasswordHashing};
pub use client::Client;
pub use config::{SessionConfig, TransportConfig};
pub use errors::{ClientError, ErrorKind, Result};
pub use session::{AuthPhase, ClientSnapshot, ErrorHook, LogErrors, RoomRef, Session};
pub use transport::{HttpTransport, Method, Response, Transport, TransportRequest};
pub use netsblox_primitives as primitives;
pub use url::Url;

/// Current version of the client library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
