use serde::{Deserialize, Serialize};

/// State of a friend link between two users.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FriendLinkState {
    Pending,
    Approved,
    Rejected,
    Blocked,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FriendLink {
    pub sender: String,
    #[serde(alias = "recipient")]
    pub receiver: String,
    pub state: FriendLinkState,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FriendInvite {
    #[serde(default)]
    pub id: Option<String>,
    pub sender: String,
    #[serde(alias = "recipient")]
    pub receiver: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn friend_link_accepts_recipient_field() {
        let link: FriendLink = serde_json::from_value(json!({
            "sender": "admin",
            "recipient": "brian",
            "state": "Blocked",
        }))
        .unwrap();

        assert_eq!(link.receiver, "brian");
        assert_eq!(link.state, FriendLinkState::Blocked);
    }
}
