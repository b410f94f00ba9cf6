use core::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

id_type!(
    /// Server-assigned project (room) identifier.
    ProjectId
);
id_type!(
    /// Identifier of a role within a project.
    RoleId
);

/// Visibility of a project or library.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PublishState {
    #[default]
    Private,
    Public,
    PendingApproval,
    ApprovalDenied,
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SaveState {
    Created,
    #[default]
    Transient,
    Broken,
    Saved,
}

/// Storage references for a role's code and media.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleMetadata {
    pub name: String,
    pub code: String,
    pub media: String,
}

/// Full contents of a role.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleData {
    pub name: String,
    pub code: String,
    pub media: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub id: ProjectId,
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub state: PublishState,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub save_state: SaveState,
    pub roles: IndexMap<RoleId, RoleMetadata>,
}

impl ProjectMetadata {
    /// The role listed first by the server, used as the default role to occupy.
    #[must_use]
    pub fn first_role(&self) -> Option<&RoleId> {
        self.roles.keys().next()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub state: PublishState,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub save_state: SaveState,
    pub roles: IndexMap<RoleId, RoleData>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<RoleData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_state: Option<SaveState>,
}

/// Rename payload shared by projects and roles.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}
