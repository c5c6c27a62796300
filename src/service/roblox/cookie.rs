//! Legacy cookie-authenticated Roblox client.
//!
//! Authenticates with a `.ROBLOSECURITY` cookie and the CSRF-token handshake
//! the classic endpoints require: mutating requests need an `X-CSRF-TOKEN`
//! obtained by letting a request fail once, and a 403 carrying a fresh token
//! means "retry with this one". That retry happens exactly once per call.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serenity::async_trait;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::service::roblox::{GroupRank, RobloxClient, RobloxProfile};

const COOKIE_WARNING_PREFIX: &str = "_|WARNING:-DO-NOT-SHARE-THIS.--Sharing-this-will-allow-someone-to-log-in-as-you-and-to-steal-your-ROBUX-and-items.|_";

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
struct UserGroupsResponse {
    data: Vec<UserGroupEntry>,
}

#[derive(Deserialize)]
struct UserGroupEntry {
    group: GroupInfo,
    role: RoleInfo,
}

#[derive(Deserialize)]
struct GroupInfo {
    id: u64,
}

#[derive(Deserialize)]
struct RoleInfo {
    id: u64,
    name: String,
    rank: u32,
}

#[derive(Serialize)]
struct SetRankRequest {
    #[serde(rename = "roleId")]
    role_id: u64,
}

/// Roblox client using `.ROBLOSECURITY` cookie authentication.
pub struct CookieClient {
    http: reqwest::Client,
    cookie: String,
    csrf_token: RwLock<Option<String>>,
}

impl CookieClient {
    /// Creates a new cookie-authenticated client.
    ///
    /// Accepts the cookie with or without the Roblox warning prefix and
    /// normalizes it.
    ///
    /// # Arguments
    /// - `http` - Shared reqwest client
    /// - `cookie` - The `.ROBLOSECURITY` cookie value
    ///
    /// # Returns
    /// - `CookieClient` - New client instance
    pub fn new(http: reqwest::Client, cookie: &str) -> Self {
        let cookie = if cookie.contains("|_") {
            cookie.to_string()
        } else {
            format!("{}{}", COOKIE_WARNING_PREFIX, cookie)
        };

        Self {
            http,
            cookie,
            csrf_token: RwLock::new(None),
        }
    }

    fn cookie_header(&self) -> String {
        format!(".ROBLOSECURITY={}", self.cookie)
    }

    /// Obtains a fresh CSRF token by provoking a rejected mutating request.
    ///
    /// The classic API hands the token back in the `x-csrf-token` response
    /// header of the failed call.
    async fn refresh_csrf_token(&self) -> Result<String, AppError> {
        let response = self
            .http
            .post("https://auth.roblox.com/v2/logout")
            .header("Cookie", self.cookie_header())
            .header("User-Agent", "Roblox/WinInet")
            .send()
            .await?;

        let token = response
            .headers()
            .get("x-csrf-token")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::ExternalService("Roblox did not return a CSRF token".to_string())
            })?;

        *self.csrf_token.write().await = Some(token.clone());
        Ok(token)
    }

    async fn current_csrf_token(&self) -> Result<String, AppError> {
        if let Some(token) = self.csrf_token.read().await.clone() {
            return Ok(token);
        }
        self.refresh_csrf_token().await
    }

    async fn try_set_rank(
        &self,
        user_id: u64,
        group_id: u64,
        role_id: u64,
        token: &str,
    ) -> Result<reqwest::Response, AppError> {
        let response = self
            .http
            .patch(format!(
                "https://groups.roblox.com/v1/groups/{}/users/{}",
                group_id, user_id
            ))
            .header("Cookie", self.cookie_header())
            .header("User-Agent", "Roblox/WinInet")
            .header("X-CSRF-TOKEN", token)
            .json(&SetRankRequest { role_id })
            .send()
            .await?;

        Ok(response)
    }
}

#[async_trait]
impl RobloxClient for CookieClient {
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
        let response = self
            .http
            .get(format!(
                "https://groups.roblox.com/v2/users/{}/groups/roles",
                user_id
            ))
            .header("User-Agent", "Roblox/WinInet")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "group roles lookup failed with status {}",
                response.status()
            )));
        }

        let body: UserGroupsResponse = response.json().await?;
        Ok(body
            .data
            .into_iter()
            .find(|entry| entry.group.id == group_id)
            .map(|entry| GroupRank {
                role_id: entry.role.id,
                role_name: entry.role.name,
                rank: entry.role.rank,
            }))
    }

    async fn set_rank(&self, user_id: u64, group_id: u64, role_id: u64) -> Result<(), AppError> {
        let token = self.current_csrf_token().await?;
        let response = self.try_set_rank(user_id, group_id, role_id, &token).await?;

        let response = if response.status() == StatusCode::FORBIDDEN {
            // A 403 carrying a fresh token means the CSRF token went stale:
            // adopt it and retry exactly once. A bare 403 is a permission
            // failure and falls through to the status mapping below.
            match response
                .headers()
                .get("x-csrf-token")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
            {
                Some(fresh) => {
                    *self.csrf_token.write().await = Some(fresh.clone());
                    self.try_set_rank(user_id, group_id, role_id, &fresh).await?
                }
                None => response,
            }
        } else {
            response
        };

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::FORBIDDEN => Err(AppError::ExternalService(
                "bot lacks permission to change ranks in this group".to_string(),
            )),
            StatusCode::UNAUTHORIZED => Err(AppError::ExternalService(
                "cookie is invalid or expired".to_string(),
            )),
            StatusCode::BAD_REQUEST => Err(AppError::ExternalService(
                "invalid target role or user not in group".to_string(),
            )),
            status => Err(AppError::ExternalService(format!(
                "rank update failed with status {}",
                status
            ))),
        }
    }
}
