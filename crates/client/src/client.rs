//! Resource methods of the NetsBlox cloud
//!
//! [`Client`] wraps a [`Session`] and maps each supported endpoint onto a
//! typed call. Methods taking an optional username fall back to the logged
//! in user; room-scoped methods operate on the session's current room.

use std::borrow::Cow;
use std::collections::BTreeMap;

use netsblox_primitives::collaboration::{CollaborationInvite, InvitationState};
use netsblox_primitives::friends::{FriendInvite, FriendLinkState};
use netsblox_primitives::groups::{CreateGroupData, Group, UpdateGroupData};
use netsblox_primitives::libraries::{CreateLibraryData, LibraryMetadata};
use netsblox_primitives::network::{NetworkTraceMetadata, OccupantInvite, RoomState};
use netsblox_primitives::projects::{
    CreateProjectData, Project, ProjectId, ProjectMetadata, PublishState, RenameData, RoleData,
    RoleId,
};
use netsblox_primitives::services::{AuthorizedServiceHost, ServiceHost, ServiceSettings};
use netsblox_primitives::users::{
    LinkedAccount, NewUser, ServerConfiguration, StrategyCredentials, User,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::errors::Result;
use crate::session::{RoomRef, Session};
use crate::transport::{HttpTransport, Method, Response, Transport};

/// Percent-encodes a single path segment.
fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

#[derive(Debug)]
pub struct Client<T = HttpTransport> {
    session: Session<T>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
        }
    }
}

impl<T: Transport + 'static> Client<T> {
    pub const fn new(session: Session<T>) -> Self {
        Self { session }
    }

    pub const fn session(&self) -> &Session<T> {
        &self.session
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.session.get(path).await?;
        self.decode(&response)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self.session.post(path, body).await?;
        self.decode(&response)
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        Ok(self.session.get(path).await?.text_or_json_string())
    }

    fn decode<R: DeserializeOwned>(&self, response: &Response) -> Result<R> {
        response.json().map_err(|err| self.session.report(err))
    }

    fn user_or_me(&self, username: Option<&str>) -> Result<String> {
        match username {
            Some(username) => Ok(username.to_owned()),
            None => self.session.require_username(),
        }
    }

    fn client_id_query(&self) -> String {
        self.session
            .client_id()
            .map(|id| format!("?clientId={}", segment(&id)))
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Users
    // ---------------------------------------------------------------------

    pub async fn whoami(&self) -> Result<String> {
        self.session.whoami().await
    }

    pub async fn configuration(&self) -> Result<ServerConfiguration> {
        self.get_json("/configuration").await
    }

    pub async fn view_user(&self, username: Option<&str>) -> Result<User> {
        let username = self.user_or_me(username)?;
        self.get_json(&format!("/users/{}", segment(&username)))
            .await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json("/users/").await
    }

    /// Creates an account. Any password is hashed like a login secret.
    pub async fn create_user(&self, mut user: NewUser) -> Result<String> {
        let hashing = self.session.password_hashing();
        user.password = user.password.map(|password| hashing.apply(&password));

        let response = self.session.post("/users/create", &user).await?;
        Ok(response.text_or_json_string())
    }

    pub async fn signup(&self, username: &str, password: &str, email: &str) -> Result<String> {
        self.create_user(NewUser {
            username: username.to_owned(),
            email: email.to_owned(),
            password: Some(password.to_owned()),
            group_id: None,
            role: None,
        })
        .await
    }

    /// Creates an account without a password; the server emails one.
    pub async fn register(&self, username: &str, email: &str) -> Result<String> {
        self.create_user(NewUser {
            username: username.to_owned(),
            email: email.to_owned(),
            password: None,
            group_id: None,
            role: None,
        })
        .await
    }

    pub async fn reset_password(&self, username: &str) -> Result<()> {
        let path = format!("/users/{}/password", segment(username));
        let _response = self.session.post_empty(&path).await?;
        Ok(())
    }

    pub async fn set_password(&self, username: Option<&str>, password: &str) -> Result<()> {
        let username = self.user_or_me(username)?;
        let password = self.session.password_hashing().apply(password);

        let path = format!("/users/{}/password", segment(&username));
        let _response = self.session.patch(&path, &password).await?;
        Ok(())
    }

    /// Links an account of another login strategy to the current user.
    pub async fn link_account(&self, username: &str, password: &str, strategy: &str) -> Result<()> {
        let me = self.user_or_me(None)?;
        let body = BTreeMap::from([(
            strategy.to_owned(),
            StrategyCredentials {
                username: username.to_owned(),
                password: password.to_owned(),
            },
        )]);

        let path = format!("/users/{}/link", segment(&me));
        let _response = self.session.post(&path, &body).await?;
        Ok(())
    }

    pub async fn unlink_account(&self, account: &LinkedAccount) -> Result<()> {
        let me = self.user_or_me(None)?;
        let path = format!("/users/{}/unlink", segment(&me));
        let _response = self.session.post(&path, account).await?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Friends
    // ---------------------------------------------------------------------

    pub async fn list_friends(&self) -> Result<Vec<String>> {
        let me = self.user_or_me(None)?;
        self.get_json(&format!("/friends/{}/", segment(&me))).await
    }

    pub async fn list_online_friends(&self) -> Result<Vec<String>> {
        let me = self.user_or_me(None)?;
        self.get_json(&format!("/friends/{}/online", segment(&me)))
            .await
    }

    pub async fn list_friend_invites(&self) -> Result<Vec<FriendInvite>> {
        let me = self.user_or_me(None)?;
        self.get_json(&format!("/friends/{}/invites/", segment(&me)))
            .await
    }

    pub async fn send_friend_invite(&self, recipient: &str) -> Result<()> {
        let me = self.user_or_me(None)?;
        let path = format!("/friends/{}/invite/", segment(&me));
        let _response = self.session.post(&path, recipient.trim()).await?;
        Ok(())
    }

    pub async fn respond_to_friend_invite(&self, sender: &str, state: FriendLinkState) -> Result<()> {
        let me = self.user_or_me(None)?;
        let path = format!("/friends/{}/invites/{}", segment(&me), segment(sender));
        let _response = self.session.post(&path, &state).await?;
        Ok(())
    }

    pub async fn unfriend(&self, friend: &str) -> Result<()> {
        self.friend_action("unfriend", friend).await
    }

    pub async fn block(&self, friend: &str) -> Result<()> {
        self.friend_action("block", friend).await
    }

    pub async fn unblock(&self, friend: &str) -> Result<()> {
        self.friend_action("unblock", friend).await
    }

    async fn friend_action(&self, action: &str, friend: &str) -> Result<()> {
        let me = self.user_or_me(None)?;
        let path = format!(
            "/friends/{}/{action}/{}",
            segment(&me),
            segment(friend.trim())
        );
        let _response = self.session.post_empty(&path).await?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Groups
    // ---------------------------------------------------------------------

    pub async fn list_groups(&self, owner: Option<&str>) -> Result<Vec<Group>> {
        let owner = self.user_or_me(owner)?;
        self.get_json(&format!("/groups/user/{}/", segment(&owner)))
            .await
    }

    pub async fn create_group(&self, data: &CreateGroupData) -> Result<Group> {
        let owner = self.user_or_me(None)?;
        self.post_json(&format!("/groups/user/{}/", segment(&owner)), data)
            .await
    }

    pub async fn view_group(&self, id: &str) -> Result<Group> {
        self.get_json(&format!("/groups/id/{}", segment(id))).await
    }

    pub async fn update_group(&self, id: &str, data: &UpdateGroupData) -> Result<Group> {
        let path = format!("/groups/id/{}", segment(id));
        let response = self.session.patch(&path, data).await?;
        self.decode(&response)
    }

    pub async fn delete_group(&self, id: &str) -> Result<()> {
        let path = format!("/groups/id/{}", segment(id));
        let _response = self.session.delete(&path).await?;
        Ok(())
    }

    pub async fn list_members(&self, id: &str) -> Result<Vec<User>> {
        self.get_json(&format!("/groups/id/{}/members", segment(id)))
            .await
    }

    // ---------------------------------------------------------------------
    // Projects
    // ---------------------------------------------------------------------

    /// See [`Session::new_project`].
    pub async fn new_project(&self, name: &str) -> Result<ProjectMetadata> {
        self.session.new_project(name).await
    }

    /// Uploads a complete project on behalf of this client.
    pub async fn import_project(&self, mut data: CreateProjectData) -> Result<ProjectMetadata> {
        data.client_id = self.session.client_id();
        self.post_json("/projects/", &data).await
    }

    pub async fn list_user_projects(&self, owner: Option<&str>) -> Result<Vec<ProjectMetadata>> {
        let owner = self.user_or_me(owner)?;
        self.get_json(&format!("/projects/user/{}", segment(&owner)))
            .await
    }

    pub async fn list_shared_projects(
        &self,
        username: Option<&str>,
    ) -> Result<Vec<ProjectMetadata>> {
        let username = self.user_or_me(username)?;
        self.get_json(&format!("/projects/shared/{}", segment(&username)))
            .await
    }

    pub async fn list_public_projects(&self) -> Result<Vec<ProjectMetadata>> {
        self.get_json("/projects/public/").await
    }

    pub async fn get_project_metadata(&self, id: &ProjectId) -> Result<ProjectMetadata> {
        self.get_json(&format!("/projects/id/{}/metadata", segment(id.as_str())))
            .await
    }

    pub async fn get_project_named(&self, owner: &str, name: &str) -> Result<Project> {
        self.get_json(&format!(
            "/projects/user/{}/{}",
            segment(owner),
            segment(name)
        ))
        .await
    }

    pub async fn rename_project(&self, id: &ProjectId, name: &str) -> Result<ProjectMetadata> {
        let body = RenameData {
            name: name.to_owned(),
            client_id: self.session.client_id(),
        };
        let path = format!("/projects/id/{}", segment(id.as_str()));
        let response = self.session.patch(&path, &body).await?;
        self.decode(&response)
    }

    /// See [`Session::set_project_name`].
    pub async fn set_project_name(&self, name: &str) -> Result<()> {
        self.session.set_project_name(name).await
    }

    pub async fn delete_project(&self, id: &ProjectId) -> Result<()> {
        let path = format!("/projects/id/{}", segment(id.as_str()));
        let _response = self.session.delete(&path).await?;
        Ok(())
    }

    /// Requests publication; moderated servers answer `PendingApproval`.
    pub async fn publish_project(&self, id: &ProjectId) -> Result<PublishState> {
        let path = format!("/projects/id/{}/publish", segment(id.as_str()));
        let response = self.session.post_empty(&path).await?;
        self.decode(&response)
    }

    pub async fn unpublish_project(&self, id: &ProjectId) -> Result<()> {
        let path = format!("/projects/id/{}/unpublish", segment(id.as_str()));
        let _response = self.session.post_empty(&path).await?;
        Ok(())
    }

    pub async fn list_pending_projects(&self) -> Result<Vec<ProjectMetadata>> {
        self.get_json("/projects/mod/pending/").await
    }

    pub async fn set_project_state(
        &self,
        id: &ProjectId,
        state: PublishState,
    ) -> Result<ProjectMetadata> {
        self.post_json(&format!("/projects/mod/id/{}", segment(id.as_str())), &state)
            .await
    }

    /// URL of a project's thumbnail image, for embedding elsewhere.
    pub fn project_thumbnail_url(&self, id: &ProjectId, aspect_ratio: Option<f32>) -> Result<Url> {
        let mut path = format!("/projects/id/{}/thumbnail", segment(id.as_str()));
        if let Some(ratio) = aspect_ratio {
            path.push_str(&format!("?aspectRatio={ratio}"));
        }

        self.session.transport().config().resolve(&path)
    }

    // ---------------------------------------------------------------------
    // Roles
    // ---------------------------------------------------------------------

    /// Adds an empty role to the current project.
    pub async fn add_role(&self, name: &str) -> Result<ProjectMetadata> {
        let room = self.session.require_room().await?;
        let path = format!("/projects/id/{}/", segment(room.project_id.as_str()));
        self.post_json(&path, &json!({ "name": name })).await
    }

    /// Saves the contents of the current role.
    pub async fn save_role(&self, data: &RoleData) -> Result<()> {
        let room = self.session.require_room().await?;
        let path = role_path(&room.project_id, &room.role_id);
        let _response = self.session.post(&path, data).await?;
        Ok(())
    }

    pub async fn rename_role(&self, role_id: &RoleId, name: &str) -> Result<()> {
        let room = self.session.require_room().await?;
        let body = RenameData {
            name: name.to_owned(),
            client_id: self.session.client_id(),
        };
        let path = role_path(&room.project_id, role_id);
        let _response = self.session.patch(&path, &body).await?;
        Ok(())
    }

    pub async fn delete_role(&self, role_id: &RoleId) -> Result<()> {
        let room = self.session.require_room().await?;
        let path = role_path(&room.project_id, role_id);
        let _response = self.session.delete(&path).await?;
        Ok(())
    }

    pub async fn get_latest_role(&self, project_id: &ProjectId, role_id: &RoleId) -> Result<RoleData> {
        let path = format!("{}/latest", role_path(project_id, role_id));
        self.get_json(&path).await
    }

    /// Fetches a role and makes it the current room.
    pub async fn get_role(&self, project_id: &ProjectId, role_id: &RoleId) -> Result<RoleData> {
        let path = format!(
            "{}/latest{}",
            role_path(project_id, role_id),
            self.client_id_query()
        );
        let role = self.get_json(&path).await?;

        self.session.set_local_state(Some(RoomRef {
            project_id: project_id.clone(),
            role_id: role_id.clone(),
        }));

        Ok(role)
    }

    // ---------------------------------------------------------------------
    // Collaboration
    // ---------------------------------------------------------------------

    pub async fn list_collaborators(&self, project_id: &ProjectId) -> Result<Vec<String>> {
        self.get_json(&format!(
            "/projects/id/{}/collaborators/",
            segment(project_id.as_str())
        ))
        .await
    }

    pub async fn remove_collaborator(&self, project_id: &ProjectId, username: &str) -> Result<()> {
        let path = format!(
            "/projects/id/{}/collaborators/{}",
            segment(project_id.as_str()),
            segment(username)
        );
        let _response = self.session.delete(&path).await?;
        Ok(())
    }

    pub async fn list_collaboration_invites(&self) -> Result<Vec<CollaborationInvite>> {
        let me = self.user_or_me(None)?;
        self.get_json(&format!("/collaboration-invites/user/{}/", segment(&me)))
            .await
    }

    pub async fn invite_collaborator(&self, project_id: &ProjectId, receiver: &str) -> Result<()> {
        let path = format!(
            "/collaboration-invites/{}/invite/{}",
            segment(project_id.as_str()),
            segment(receiver)
        );
        let _response = self.session.post_empty(&path).await?;
        Ok(())
    }

    pub async fn respond_to_collaboration_invite(&self, id: &str, accepted: bool) -> Result<()> {
        let path = format!("/collaboration-invites/id/{}", segment(id));
        let _response = self
            .session
            .post(&path, &InvitationState::from(accepted))
            .await?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Libraries
    // ---------------------------------------------------------------------

    pub async fn list_community_libraries(&self) -> Result<Vec<LibraryMetadata>> {
        self.get_json("/libraries/community/").await
    }

    pub async fn list_user_libraries(&self, owner: Option<&str>) -> Result<Vec<LibraryMetadata>> {
        let owner = self.user_or_me(owner)?;
        self.get_json(&format!("/libraries/user/{}/", segment(&owner)))
            .await
    }

    /// Serialized blocks of a library.
    pub async fn get_user_library(&self, owner: &str, name: &str) -> Result<String> {
        self.get_text(&library_path(owner, name)).await
    }

    pub async fn save_user_library(&self, data: &CreateLibraryData) -> Result<LibraryMetadata> {
        let owner = self.user_or_me(None)?;
        self.post_json(&format!("/libraries/user/{}/", segment(&owner)), data)
            .await
    }

    pub async fn delete_user_library(&self, name: &str) -> Result<()> {
        let owner = self.user_or_me(None)?;
        let _response = self.session.delete(&library_path(&owner, name)).await?;
        Ok(())
    }

    pub async fn publish_library(&self, name: &str) -> Result<PublishState> {
        let owner = self.user_or_me(None)?;
        let path = format!("{}/publish", library_path(&owner, name));
        let response = self.session.post_empty(&path).await?;
        self.decode(&response)
    }

    pub async fn unpublish_library(&self, name: &str) -> Result<()> {
        let owner = self.user_or_me(None)?;
        let path = format!("{}/unpublish", library_path(&owner, name));
        let _response = self.session.post_empty(&path).await?;
        Ok(())
    }

    pub async fn list_pending_libraries(&self) -> Result<Vec<LibraryMetadata>> {
        self.get_json("/libraries/mod/pending").await
    }

    pub async fn set_library_state(&self, owner: &str, name: &str, state: PublishState) -> Result<()> {
        let path = format!("/libraries/mod/{}/{}", segment(owner), segment(name));
        let _response = self.session.post(&path, &state).await?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Network
    // ---------------------------------------------------------------------

    /// See [`Session::set_client_state`].
    pub async fn set_client_state(&self, project_id: ProjectId, role_id: RoleId) -> Result<()> {
        self.session.set_client_state(project_id, role_id).await
    }

    /// Occupancy of the current room.
    pub async fn get_room_state(&self) -> Result<RoomState> {
        let room = self.session.require_room().await?;
        self.get_json(&format!("/network/id/{}", segment(room.project_id.as_str())))
            .await
    }

    pub async fn get_rooms(&self) -> Result<Vec<RoomState>> {
        self.get_json("/network/").await
    }

    /// Invites `username` to occupy `role_id` in the current room.
    pub async fn invite_occupant(&self, username: &str, role_id: &RoleId) -> Result<()> {
        let room = self.session.require_room().await?;
        let body = OccupantInvite {
            username: username.to_owned(),
            role_id: role_id.clone(),
            sender: self.session.username(),
        };
        let path = format!(
            "/network/id/{}/occupants/invite",
            segment(room.project_id.as_str())
        );
        let _response = self.session.post(&path, &body).await?;
        Ok(())
    }

    pub async fn evict_occupant(&self, client_id: &str) -> Result<()> {
        let path = format!("/network/clients/{}/evict", segment(client_id));
        let _response = self.session.post_empty(&path).await?;
        Ok(())
    }

    pub async fn send_message(&self, message: &Value) -> Result<()> {
        let _response = self.session.post("/network/messages/", message).await?;
        Ok(())
    }

    /// Starts recording the messages of a room, returning the trace id.
    pub async fn start_network_trace(&self, project_id: &ProjectId) -> Result<String> {
        let path = format!("/network/id/{}/trace/", segment(project_id.as_str()));
        Ok(self.session.post_empty(&path).await?.text_or_json_string())
    }

    pub async fn stop_network_trace(
        &self,
        project_id: &ProjectId,
        trace_id: &str,
    ) -> Result<NetworkTraceMetadata> {
        let path = format!("{}/stop", trace_path(project_id, trace_id));
        let response = self.session.post_empty(&path).await?;
        self.decode(&response)
    }

    /// Messages recorded by a trace.
    pub async fn get_network_trace(&self, project_id: &ProjectId, trace_id: &str) -> Result<Vec<Value>> {
        let path = format!("{}/messages", trace_path(project_id, trace_id));
        self.get_json(&path).await
    }

    // ---------------------------------------------------------------------
    // Services
    // ---------------------------------------------------------------------

    pub async fn list_user_hosts(&self, username: Option<&str>) -> Result<Vec<ServiceHost>> {
        let username = self.user_or_me(username)?;
        self.get_json(&format!("/services/hosts/user/{}", segment(&username)))
            .await
    }

    pub async fn set_user_hosts(&self, hosts: &[ServiceHost]) -> Result<()> {
        let username = self.user_or_me(None)?;
        let path = format!("/services/hosts/user/{}", segment(&username));
        let _response = self.session.post(&path, hosts).await?;
        Ok(())
    }

    pub async fn list_group_hosts(&self, group_id: &str) -> Result<Vec<ServiceHost>> {
        self.get_json(&format!("/services/hosts/group/{}", segment(group_id)))
            .await
    }

    pub async fn set_group_hosts(&self, group_id: &str, hosts: &[ServiceHost]) -> Result<()> {
        let path = format!("/services/hosts/group/{}", segment(group_id));
        let _response = self.session.post(&path, hosts).await?;
        Ok(())
    }

    pub async fn get_authorized_hosts(&self) -> Result<Vec<AuthorizedServiceHost>> {
        self.get_json("/services/hosts/authorized/").await
    }

    /// Authorizes a services host and returns the secret it authenticates
    /// with (see [`Credential::Host`](crate::Credential::Host)).
    pub async fn authorize_host(&self, host: &AuthorizedServiceHost) -> Result<String> {
        let response = self
            .session
            .post("/services/hosts/authorized/", host)
            .await?;
        Ok(response.text_or_json_string())
    }

    pub async fn unauthorize_host(&self, host_id: &str) -> Result<()> {
        let path = format!("/services/hosts/authorized/{}", segment(host_id));
        let _response = self.session.delete(&path).await?;
        Ok(())
    }

    /// Settings of the current user for `host`, as stored by that host.
    pub async fn get_user_settings(&self, host: &str) -> Result<String> {
        let username = self.user_or_me(None)?;
        self.get_text(&settings_path(&username, host)).await
    }

    /// Every settings layer (user, group, membership) visible to `host`.
    pub async fn get_all_settings(&self, username: &str, host: &str) -> Result<ServiceSettings> {
        self.get_json(&format!("{}/all", settings_path(username, host)))
            .await
    }

    /// Stores `settings` verbatim; their format is up to the host.
    pub async fn set_user_settings(&self, host: &str, settings: &str) -> Result<()> {
        let username = self.user_or_me(None)?;
        let path = settings_path(&username, host);
        let _response = self
            .session
            .request(Method::Post, &path, Some(settings.to_owned()))
            .await?;
        Ok(())
    }

    pub async fn delete_user_settings(&self, host: &str) -> Result<()> {
        let username = self.user_or_me(None)?;
        let _response = self
            .session
            .delete(&settings_path(&username, host))
            .await?;
        Ok(())
    }
}

fn role_path(project_id: &ProjectId, role_id: &RoleId) -> String {
    format!(
        "/projects/id/{}/{}",
        segment(project_id.as_str()),
        segment(role_id.as_str())
    )
}

fn library_path(owner: &str, name: &str) -> String {
    format!("/libraries/user/{}/{}", segment(owner), segment(name))
}

fn trace_path(project_id: &ProjectId, trace_id: &str) -> String {
    format!(
        "/network/id/{}/trace/{}",
        segment(project_id.as_str()),
        segment(trace_id)
    )
}

fn settings_path(username: &str, host: &str) -> String {
    format!(
        "/services/settings/user/{}/{}",
        segment(username),
        segment(host)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::errors::ClientError;

    fn client() -> Client {
        let config = SessionConfig::parse("http://cloud.test/api/").unwrap();
        Client::new(Session::new(config).unwrap())
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        assert_eq!(library_path("ann", "my lib/v2"), "/libraries/user/ann/my%20lib%2Fv2");
        assert_eq!(
            role_path(&ProjectId::from("p 1"), &RoleId::from("r?1")),
            "/projects/id/p%201/r%3F1"
        );
        assert_eq!(
            settings_path("ann", "https://svc.host"),
            "/services/settings/user/ann/https%3A%2F%2Fsvc.host"
        );
    }

    #[test]
    fn thumbnail_url_is_resolved_against_base() {
        let url = client()
            .project_thumbnail_url(&ProjectId::from("p1"), Some(1.5))
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://cloud.test/api/projects/id/p1/thumbnail?aspectRatio=1.5"
        );
    }

    #[test]
    fn current_user_is_required_when_no_username_given() {
        let client = client();

        assert!(matches!(client.user_or_me(None), Err(ClientError::NotLoggedIn)));
        assert_eq!(client.user_or_me(Some("ann")).unwrap(), "ann");

        client.session().set_username(Some("bob".to_owned()));
        assert_eq!(client.user_or_me(None).unwrap(), "bob");
    }

    #[test]
    fn client_id_is_appended_as_query() {
        let config = SessionConfig::parse("http://cloud.test")
            .unwrap()
            .with_client_id("_client 1");
        let client = Client::new(Session::new(config).unwrap());

        assert_eq!(client.client_id_query(), "?clientId=_client%201");
    }
}
