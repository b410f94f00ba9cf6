//! Request and response bodies of the NetsBlox cloud REST API.
//!
//! Every type here mirrors the JSON the server produces or consumes, with
//! camelCase field names on the wire. State enumerations are serialized
//! verbatim (`"Pending"`, `"PendingApproval"`, ...).

pub mod collaboration;
pub mod friends;
pub mod groups;
pub mod libraries;
pub mod network;
pub mod projects;
pub mod services;
pub mod users;
