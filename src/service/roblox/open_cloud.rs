//! Open Cloud Roblox client.
//!
//! Authenticates with an `x-api-key` header against the Open Cloud v2 group
//! endpoints. No cookies and no CSRF handshake; username resolution still
//! goes through the public users API, which Open Cloud does not cover.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serenity::async_trait;

use crate::error::AppError;
use crate::service::roblox::{GroupRank, RobloxClient, RobloxProfile};

const BASE_URL: &str = "https://apis.roblox.com/cloud/v2";

#[derive(Serialize)]
struct UsernamesRequest<'a> {
    usernames: [&'a str; 1],
    #[serde(rename = "excludeBannedUsers")]
    exclude_banned_users: bool,
}

#[derive(Deserialize)]
struct UsernamesResponse {
    data: Vec<UsernameEntry>,
}

#[derive(Deserialize)]
struct UsernameEntry {
    id: u64,
    name: String,
}

#[derive(Deserialize)]
struct MembershipsResponse {
    #[serde(rename = "groupMemberships", default)]
    group_memberships: Vec<Membership>,
}

#[derive(Deserialize, Clone)]
struct Membership {
    /// `groups/{groupId}/memberships/{membershipId}`
    path: String,
    /// `groups/{groupId}/roles/{roleId}`
    role: String,
}

#[derive(Deserialize)]
struct GroupRolesResponse {
    #[serde(rename = "groupRoles", default)]
    group_roles: Vec<GroupRole>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct GroupRole {
    id: String,
    #[serde(rename = "displayName")]
    display_name: String,
    rank: u32,
}

#[derive(Serialize)]
struct UpdateMembershipRequest {
    role: String,
}

/// Roblox client using Open Cloud API-key authentication.
pub struct OpenCloudClient {
    http: reqwest::Client,
    api_key: String,
}

impl OpenCloudClient {
    /// Creates a new Open Cloud client.
    ///
    /// # Arguments
    /// - `http` - Shared reqwest client
    /// - `api_key` - Open Cloud API key with group read/write permissions
    ///
    /// # Returns
    /// - `OpenCloudClient` - New client instance
    pub fn new(http: reqwest::Client, api_key: &str) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
        }
    }

    /// Fetches the user's membership resource in a group, if any.
    async fn get_membership(
        &self,
        user_id: u64,
        group_id: u64,
    ) -> Result<Option<Membership>, AppError> {
        let response = self
            .http
            .get(format!("{}/groups/{}/memberships", BASE_URL, group_id))
            .header("x-api-key", &self.api_key)
            .query(&[
                ("filter", format!("user == 'users/{}'", user_id)),
                ("maxPageSize", "1".to_string()),
            ])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: MembershipsResponse = response.json().await?;
                Ok(body.group_memberships.into_iter().next())
            }
            StatusCode::FORBIDDEN => Err(AppError::ExternalService(
                "API key lacks group read permission".to_string(),
            )),
            StatusCode::UNAUTHORIZED => Err(AppError::ExternalService(
                "API key is invalid or expired".to_string(),
            )),
            status => Err(AppError::ExternalService(format!(
                "membership lookup failed with status {}",
                status
            ))),
        }
    }

    /// Fetches every role in a group, following pagination.
    async fn get_group_roles(&self, group_id: u64) -> Result<Vec<GroupRole>, AppError> {
        let mut roles = Vec::new();
        let mut page_token: Option<String> = None;

        // Safety limit so a misbehaving pagination cursor cannot loop forever.
        for _ in 0..10 {
            let mut request = self
                .http
                .get(format!("{}/groups/{}/roles", BASE_URL, group_id))
                .header("x-api-key", &self.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(AppError::ExternalService(format!(
                    "group roles lookup failed with status {}",
                    response.status()
                )));
            }

            let body: GroupRolesResponse = response.json().await?;
            roles.extend(body.group_roles);

            match body.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(roles)
    }
}

fn role_id_from_path(path: &str) -> Option<&str> {
    path.rsplit('/').next()
}

#[async_trait]
impl RobloxClient for OpenCloudClient {
    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<RobloxProfile>, AppError> {
        let response = self
            .http
            .post("https://users.roblox.com/v1/usernames/users")
            .json(&UsernamesRequest {
                usernames: [username],
                exclude_banned_users: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "username lookup failed with status {}",
                response.status()
            )));
        }

        let body: UsernamesResponse = response.json().await?;
        Ok(body
            .data
            .into_iter()
            .next()
            .map(|entry| RobloxProfile {
                id: entry.id,
                name: entry.name,
            }))
    }

    async fn get_rank_in_group(
        &self,
        user_id: u64,
        group_id: u64,
    ) -> Result<Option<GroupRank>, AppError> {
        let Some(membership) = self.get_membership(user_id, group_id).await? else {
            return Ok(None);
        };

        let Some(role_id) = role_id_from_path(&membership.role) else {
            return Err(AppError::ExternalService(format!(
                "unparseable role path '{}'",
                membership.role
            )));
        };

        let roles = self.get_group_roles(group_id).await?;
        let Some(role) = roles.into_iter().find(|r| r.id == role_id) else {
            return Err(AppError::ExternalService(format!(
                "role {} not present in group {}",
                role_id, group_id
            )));
        };

        Ok(Some(GroupRank {
            role_id: role.id.parse().map_err(|_| {
                AppError::ExternalService(format!("non-numeric role id '{}'", role.id))
            })?,
            role_name: role.display_name,
            rank: role.rank,
        }))
    }

    async fn set_rank(&self, user_id: u64, group_id: u64, role_id: u64) -> Result<(), AppError> {
        let Some(membership) = self.get_membership(user_id, group_id).await? else {
            return Err(AppError::ExternalService(
                "user is not a member of the group".to_string(),
            ));
        };

        let response = self
            .http
            .patch(format!("{}/{}", BASE_URL, membership.path))
            .header("x-api-key", &self.api_key)
            .query(&[("updateMask", "role")])
            .json(&UpdateMembershipRequest {
                role: format!("groups/{}/roles/{}", group_id, role_id),
            })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::FORBIDDEN => Err(AppError::ExternalService(
                "API key lacks permission to change ranks in this group".to_string(),
            )),
            StatusCode::UNAUTHORIZED => Err(AppError::ExternalService(
                "API key is invalid or expired".to_string(),
            )),
            StatusCode::BAD_REQUEST => Err(AppError::ExternalService(
                "invalid target role for this group".to_string(),
            )),
            StatusCode::NOT_FOUND => Err(AppError::ExternalService(
                "group or membership not found".to_string(),
            )),
            status => Err(AppError::ExternalService(format!(
                "rank update failed with status {}",
                status
            ))),
        }
    }
}
