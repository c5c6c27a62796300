//! Discord <-> Roblox identity linking.
//!
//! Links a Discord account to a Roblox identity resolved through the
//! platform client, vivifying the ledger row when needed. The link is
//! set-once: neither side can be re-pointed without an explicit unlink, and
//! unlink is the ledger's only hard delete.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::data::user::UserRepository;
use crate::error::AppError;
use crate::model::user::UserRecord;
use crate::service::roblox::RobloxClient;

/// Service managing the verification link.
pub struct VerifyService<'a> {
    db: &'a DatabaseConnection,
    roblox: Arc<dyn RobloxClient>,
}

impl<'a> VerifyService<'a> {
    /// Creates a new VerifyService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `roblox` - Platform client for username resolution
    ///
    /// # Returns
    /// - `VerifyService` - New service instance
    pub fn new(db: &'a DatabaseConnection, roblox: Arc<dyn RobloxClient>) -> Self {
        Self { db, roblox }
    }

    /// Links a Discord account to a Roblox username.
    ///
    /// # Arguments
    /// - `discord_id` - Discord user ID being linked
    /// - `username` - Claimed Roblox username
    ///
    /// # Returns
    /// - `Ok(UserRecord)` - The linked, verified ledger record
    /// - `Err(AppError::InvalidArgument)` - Either side is already linked
    /// - `Err(AppError::NotFound)` - No Roblox account with that username
    /// - `Err(AppError::ExternalService)` - Platform unreachable
    pub async fn link(&self, discord_id: &str, username: &str) -> Result<UserRecord, AppError> {
        let repo = UserRepository::new(self.db);

        if repo.find_by_discord_id(discord_id).await?.is_some() {
            return Err(AppError::InvalidArgument(
                "This Discord account is already linked to a Roblox account.".to_string(),
            ));
        }

        let profile = self
            .roblox
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("Roblox user not found.".to_string()))?;

        let roblox_id = profile.id.to_string();
        let mut record = match repo.find_by_roblox_id(&roblox_id).await? {
            Some(record) => record,
            None => UserRecord::new(roblox_id.clone(), profile.name.clone()),
        };

        if record.discord_id.is_some() {
            return Err(AppError::InvalidArgument(
                "That Roblox account is already linked to another Discord user.".to_string(),
            ));
        }

        record.discord_id = Some(discord_id.to_string());
        record.is_verified = true;
        record.roblox_username = profile.name;

        repo.save(record).await
    }

    /// Removes a Discord account's link, deleting the ledger row.
    ///
    /// # Arguments
    /// - `discord_id` - Discord user ID being unlinked
    ///
    /// # Returns
    /// - `Ok(UserRecord)` - The record as it stood before deletion
    /// - `Err(AppError::NotFound)` - The account was not linked
    pub async fn unlink(&self, discord_id: &str) -> Result<UserRecord, AppError> {
        let repo = UserRepository::new(self.db);

        let record = repo
            .find_by_discord_id(discord_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("This Discord account is not linked to a Roblox account.".to_string())
            })?;

        repo.delete(&record.roblox_id).await?;

        Ok(record)
    }
}
