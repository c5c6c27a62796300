//! User ledger repository for database operations.
//!
//! This module provides the `UserRepository` for managing ledger rows. Reads
//! convert entity rows to `UserRecord` at the boundary; writes replace the
//! whole row so pruned history keys stay pruned.

use migration::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::error::AppError;
use crate::model::period::{Period, RollingMetric};
use crate::model::user::UserRecord;

/// Maps a period and rolling metric onto its ledger column.
///
/// Exhaustive by construction: adding a period or metric forces every call
/// site through this match.
pub fn rolling_column(period: Period, metric: RollingMetric) -> entity::user::Column {
    use entity::user::Column;

    match (period, metric) {
        (Period::Weekly, RollingMetric::ClimbingPoints) => Column::WeeklyXp,
        (Period::Weekly, RollingMetric::GuidePoints) => Column::WeeklyGuidePoints,
        (Period::Weekly, RollingMetric::Expeditions) => Column::WeeklyExpeditions,
        (Period::Monthly, RollingMetric::ClimbingPoints) => Column::MonthlyXp,
        (Period::Monthly, RollingMetric::GuidePoints) => Column::MonthlyGuidePoints,
        (Period::Monthly, RollingMetric::Expeditions) => Column::MonthlyExpeditions,
    }
}

/// Repository providing database operations for the points ledger.
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a ledger row by Roblox ID.
    ///
    /// # Arguments
    /// - `roblox_id` - Roblox user ID the row is keyed by
    ///
    /// # Returns
    /// - `Ok(Some(UserRecord))` - Row found and converted
    /// - `Ok(None)` - No row for that identity
    /// - `Err(AppError)` - Database error or corrupt JSON column
    pub async fn find_by_roblox_id(&self, roblox_id: &str) -> Result<Option<UserRecord>, AppError> {
        let entity = entity::prelude::User::find_by_id(roblox_id).one(self.db).await?;

        entity.map(UserRecord::from_entity).transpose()
    }

    /// Finds a ledger row by the linked Discord ID.
    ///
    /// # Arguments
    /// - `discord_id` - Discord user ID linked during verification
    ///
    /// # Returns
    /// - `Ok(Some(UserRecord))` - A row is linked to that Discord account
    /// - `Ok(None)` - No linked row
    /// - `Err(AppError)` - Database error or corrupt JSON column
    pub async fn find_by_discord_id(
        &self,
        discord_id: &str,
    ) -> Result<Option<UserRecord>, AppError> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::DiscordId.eq(discord_id))
            .one(self.db)
            .await?;

        entity.map(UserRecord::from_entity).transpose()
    }

    /// Saves a ledger record by whole-row replacement.
    ///
    /// Inserts the row or, on conflict with the Roblox ID key, overwrites
    /// every column. Partial column merges are deliberately not offered here:
    /// they would resurrect history keys a remove action pruned.
    ///
    /// # Arguments
    /// - `record` - The record to persist
    ///
    /// # Returns
    /// - `Ok(UserRecord)` - The persisted record as read back
    /// - `Err(AppError)` - Database error during upsert
    pub async fn save(&self, record: UserRecord) -> Result<UserRecord, AppError> {
        use entity::user::Column;

        let entity = entity::prelude::User::insert(record.into_active_model())
            .on_conflict(
                OnConflict::column(Column::RobloxId)
                    .update_columns([
                        Column::RobloxUsername,
                        Column::DiscordId,
                        Column::Xp,
                        Column::WeeklyXp,
                        Column::MonthlyXp,
                        Column::GuidePoints,
                        Column::WeeklyGuidePoints,
                        Column::MonthlyGuidePoints,
                        Column::SarPoints,
                        Column::Expeditions,
                        Column::WeeklyExpeditions,
                        Column::MonthlyExpeditions,
                        Column::ExpeditionHistory,
                        Column::DifficultyStats,
                        Column::IsVerified,
                        Column::Achievements,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await?;

        UserRecord::from_entity(entity)
    }

    /// Deletes a ledger row.
    ///
    /// The only hard delete in the ledger; reached exclusively through the
    /// explicit unlink operation.
    ///
    /// # Arguments
    /// - `roblox_id` - Roblox user ID of the row to delete
    ///
    /// # Returns
    /// - `Ok(())` - Row deleted (or no matching row existed)
    /// - `Err(AppError)` - Database error during delete
    pub async fn delete(&self, roblox_id: &str) -> Result<(), AppError> {
        entity::prelude::User::delete_by_id(roblox_id)
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Returns the single highest-ranked row for a rolling metric.
    ///
    /// Ties break on Roblox ID ascending so repeated queries are stable. The
    /// caller decides whether a zero value counts as a leader (it does not,
    /// for period announcements).
    ///
    /// # Arguments
    /// - `period` - Which rolling window to rank by
    /// - `metric` - Which metric within that window
    ///
    /// # Returns
    /// - `Ok(Some(UserRecord))` - The top row
    /// - `Ok(None)` - The ledger is empty
    /// - `Err(AppError)` - Database error during query
    pub async fn top_by(
        &self,
        period: Period,
        metric: RollingMetric,
    ) -> Result<Option<UserRecord>, AppError> {
        let entity = entity::prelude::User::find()
            .order_by_desc(rolling_column(period, metric))
            .order_by_asc(entity::user::Column::RobloxId)
            .one(self.db)
            .await?;

        entity.map(UserRecord::from_entity).transpose()
    }

    /// Gets a leaderboard page ordered by a rolling metric.
    ///
    /// Read-only projection for leaderboard surfaces; ordered descending by
    /// the metric with the same stable tie-break as `top_by`.
    ///
    /// # Arguments
    /// - `period` - Which rolling window to rank by
    /// - `metric` - Which metric within that window
    /// - `page` - Zero-indexed page number
    /// - `per_page` - Number of rows per page
    ///
    /// # Returns
    /// - `Ok((records, total_pages))` - Page of records and total page count
    /// - `Err(AppError)` - Database error during pagination query
    pub async fn leaderboard(
        &self,
        period: Period,
        metric: RollingMetric,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<UserRecord>, u64), AppError> {
        let paginator = entity::prelude::User::find()
            .order_by_desc(rolling_column(period, metric))
            .order_by_asc(entity::user::Column::RobloxId)
            .paginate(self.db, per_page);

        let total = paginator.num_pages().await?;
        let entities = paginator.fetch_page(page).await?;
        let records = entities
            .into_iter()
            .map(UserRecord::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((records, total))
    }

    /// Zeroes one rolling metric on every dirty row.
    ///
    /// Selects only rows whose value is above zero and zeroes exactly that
    /// column, leaving cumulative totals and the other window untouched.
    ///
    /// # Arguments
    /// - `period` - Which rolling window to reset
    /// - `metric` - Which metric within that window
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of rows reset
    /// - `Err(AppError)` - Database error during batch update
    pub async fn reset_rolling(
        &self,
        period: Period,
        metric: RollingMetric,
    ) -> Result<u64, AppError> {
        let column = rolling_column(period, metric);

        let result = entity::prelude::User::update_many()
            .filter(column.gt(0))
            .col_expr(column, sea_orm::sea_query::Expr::value(0))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
