//! Roblox platform clients.
//!
//! One `RobloxClient` trait with two implementations selected at
//! construction: the legacy `.ROBLOSECURITY` cookie flow with its CSRF
//! handshake, and the Open Cloud API-key flow. Callers never know which is
//! active; both expose the same narrow identity/group surface.

pub mod cookie;
pub mod open_cloud;

use serenity::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{config::ConfigError, AppError};
use crate::service::roblox::{cookie::CookieClient, open_cloud::OpenCloudClient};

/// A Roblox account resolved from a username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobloxProfile {
    pub id: u64,
    pub name: String,
}

/// A member's current role within a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRank {
    pub role_id: u64,
    pub role_name: String,
    /// Numeric rank (1-255) of the role inside the group.
    pub rank: u32,
}

/// Identity and group operations against the Roblox platform.
#[async_trait]
pub trait RobloxClient: Send + Sync {
    /// Resolves a username to a profile.
    ///
    /// # Arguments
    /// - `username` - Exact Roblox username
    ///
    /// # Returns
    /// - `Ok(Some(RobloxProfile))` - Account found
    /// - `Ok(None)` - No account with that username
    /// - `Err(AppError::ExternalService)` - Platform unreachable or rejected
    async fn get_user_by_username(&self, username: &str)
        -> Result<Option<RobloxProfile>, AppError>;

    /// Gets a user's current role in a group.
    ///
    /// # Arguments
    /// - `user_id` - Roblox user ID
    /// - `group_id` - Roblox group ID
    ///
    /// # Returns
    /// - `Ok(Some(GroupRank))` - The user's role in the group
    /// - `Ok(None)` - The user is not a member of the group
    /// - `Err(AppError::ExternalService)` - Platform unreachable or rejected
    async fn get_rank_in_group(
        &self,
        user_id: u64,
        group_id: u64,
    ) -> Result<Option<GroupRank>, AppError>;

    /// Moves a user onto a target group role.
    ///
    /// # Arguments
    /// - `user_id` - Roblox user ID
    /// - `group_id` - Roblox group ID
    /// - `role_id` - Target role ID from the level table
    ///
    /// # Returns
    /// - `Ok(())` - Rank updated
    /// - `Err(AppError::ExternalService)` - Unauthorized, not a member,
    ///   invalid target role, or platform unreachable
    async fn set_rank(&self, user_id: u64, group_id: u64, role_id: u64) -> Result<(), AppError>;
}

/// Selects the platform client from configuration.
///
/// Prefers the Open Cloud API key when both credentials are present; falls
/// back to the cookie flow. One of the two must be configured.
///
/// # Arguments
/// - `config` - Application configuration carrying the credentials
/// - `http` - Shared reqwest client
///
/// # Returns
/// - `Ok(Arc<dyn RobloxClient>)` - The selected client
/// - `Err(AppError::ConfigErr)` - Neither credential is configured
pub fn client_from_config(
    config: &Config,
    http: reqwest::Client,
) -> Result<Arc<dyn RobloxClient>, AppError> {
    if let Some(api_key) = &config.roblox_open_cloud_api_key {
        tracing::info!("using Open Cloud authentication for Roblox");
        return Ok(Arc::new(OpenCloudClient::new(http, api_key)));
    }

    if let Some(cookie) = &config.roblox_cookie {
        tracing::info!("using cookie authentication for Roblox");
        return Ok(Arc::new(CookieClient::new(http, cookie)));
    }

    Err(ConfigError::MissingEnvVar(
        "ROBLOX_OPENCLOUD_API_KEY or ROBLOX_COOKIE".to_string(),
    )
    .into())
}
