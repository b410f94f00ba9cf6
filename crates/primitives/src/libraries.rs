use serde::{Deserialize, Serialize};

use crate::projects::PublishState;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryMetadata {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub state: PublishState,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateLibraryData {
    pub name: String,
    pub notes: String,
    /// Serialized block definitions (XML).
    pub blocks: String,
}
