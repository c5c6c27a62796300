//! Points ledger orchestration.
//!
//! `PointsService` is the single entry point for every climbing and guide
//! points mutation: validate, load or vivify the record, apply the pure
//! arithmetic, persist by whole-row replacement, and report the tier
//! transition. Firing the external rank sync on a tier change is the
//! caller's job, never this service's - a sync failure must not be able to
//! roll back a persisted write.

use sea_orm::DatabaseConnection;

use crate::data::user::UserRepository;
use crate::error::AppError;
use crate::model::level::{LevelTables, LevelTier};
use crate::model::points::{ActionContext, PointsAction};
use crate::model::user::UserRecord;

/// Result of a ledger mutation, carrying the tier transition.
#[derive(Debug, Clone)]
pub struct PointsOutcome {
    /// The record as persisted.
    pub record: UserRecord,
    /// Tier before the action.
    pub old_tier: LevelTier,
    /// Tier after the action.
    pub new_tier: LevelTier,
}

impl PointsOutcome {
    /// Whether the action crossed a tier boundary in either direction.
    pub fn leveled(&self) -> bool {
        self.old_tier.name != self.new_tier.name
    }
}

/// Service providing the four-action ledger operations.
pub struct PointsService<'a> {
    db: &'a DatabaseConnection,
    levels: &'a LevelTables,
}

impl<'a> PointsService<'a> {
    /// Creates a new PointsService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `levels` - The configured level tables
    ///
    /// # Returns
    /// - `PointsService` - New service instance
    pub fn new(db: &'a DatabaseConnection, levels: &'a LevelTables) -> Self {
        Self { db, levels }
    }

    /// Applies a climbing-points action to a Roblox identity.
    ///
    /// An unknown identity is auto-vivified as a zeroed record rather than
    /// rejected. The stored username is refreshed from `roblox_username`
    /// since callers resolve it from the live platform immediately before.
    ///
    /// # Arguments
    /// - `roblox_id` - Roblox user ID the ledger row is keyed by
    /// - `roblox_username` - Current Roblox username
    /// - `action` - Which of the four mutations to apply
    /// - `amount` - Points amount, must be non-negative
    /// - `context` - Optional mountain/difficulty for Add and Remove
    ///
    /// # Returns
    /// - `Ok(PointsOutcome)` - Persisted record plus the tier transition
    /// - `Err(AppError::InvalidArgument)` - Negative amount, nothing written
    /// - `Err(AppError)` - Database error
    pub async fn apply_points_action(
        &self,
        roblox_id: &str,
        roblox_username: &str,
        action: PointsAction,
        amount: i64,
        context: &ActionContext,
    ) -> Result<PointsOutcome, AppError> {
        validate_amount(amount)?;

        let repo = UserRepository::new(self.db);
        let mut record = self
            .load_or_vivify(&repo, roblox_id, roblox_username)
            .await?;

        let old_tier = self.levels.climbing.level_for(record.xp).clone();
        record.apply_points(action, amount, context);
        let record = repo.save(record).await?;
        let new_tier = self.levels.climbing.level_for(record.xp).clone();

        Ok(PointsOutcome {
            record,
            old_tier,
            new_tier,
        })
    }

    /// Applies a guide-points action to a Roblox identity.
    ///
    /// Identical four-action shape over the guide fields with no expedition
    /// coupling; the tier transition is computed against the guide ladder.
    ///
    /// # Arguments
    /// - `roblox_id` - Roblox user ID the ledger row is keyed by
    /// - `roblox_username` - Current Roblox username
    /// - `action` - Which of the four mutations to apply
    /// - `amount` - Points amount, must be non-negative
    ///
    /// # Returns
    /// - `Ok(PointsOutcome)` - Persisted record plus the tier transition
    /// - `Err(AppError::InvalidArgument)` - Negative amount, nothing written
    /// - `Err(AppError)` - Database error
    pub async fn apply_guide_action(
        &self,
        roblox_id: &str,
        roblox_username: &str,
        action: PointsAction,
        amount: i64,
    ) -> Result<PointsOutcome, AppError> {
        validate_amount(amount)?;

        let repo = UserRepository::new(self.db);
        let mut record = self
            .load_or_vivify(&repo, roblox_id, roblox_username)
            .await?;

        let old_tier = self.levels.guide.level_for(record.guide_points).clone();
        record.apply_guide(action, amount);
        let record = repo.save(record).await?;
        let new_tier = self.levels.guide.level_for(record.guide_points).clone();

        Ok(PointsOutcome {
            record,
            old_tier,
            new_tier,
        })
    }

    async fn load_or_vivify(
        &self,
        repo: &UserRepository<'_>,
        roblox_id: &str,
        roblox_username: &str,
    ) -> Result<UserRecord, AppError> {
        match repo.find_by_roblox_id(roblox_id).await? {
            Some(mut record) => {
                if !roblox_username.is_empty() {
                    record.roblox_username = roblox_username.to_string();
                }
                Ok(record)
            }
            None => Ok(UserRecord::new(roblox_id, roblox_username)),
        }
    }
}

fn validate_amount(amount: i64) -> Result<(), AppError> {
    if amount < 0 {
        return Err(AppError::InvalidArgument(
            "Amount must be non-negative.".to_string(),
        ));
    }
    Ok(())
}
