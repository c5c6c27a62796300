//! Hall of fame repository for period champion records.
//!
//! Champion records use column-merge writes: only the categories being
//! recorded are updated on conflict, so a weekly record written for the
//! climber never clobbers a host already stored for the same period.

use chrono::{DateTime, Utc};
use migration::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::error::AppError;
use crate::model::period::{Period, PeriodSnapshot};

/// Repository providing database operations for hall-of-fame records.
pub struct HallOfFameRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> HallOfFameRepository<'a> {
    /// Creates a new HallOfFameRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `HallOfFameRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records the champions of an elapsed period.
    ///
    /// Upserts the period's record row, updating only the category columns
    /// present in the snapshot. Categories with no champion this period stay
    /// untouched, preserving anything recorded for them earlier.
    ///
    /// # Arguments
    /// - `record_id` - Record key, e.g. `weekly-2026-07-27` or `monthly-2026-07`
    /// - `period` - Which cadence the record belongs to
    /// - `year` - Calendar year of the elapsed period
    /// - `recorded_at` - When the record was written
    /// - `snapshot` - Champions computed at reset time
    ///
    /// # Returns
    /// - `Ok(())` - Record written
    /// - `Err(AppError)` - Database error during upsert
    pub async fn record_champions(
        &self,
        record_id: &str,
        period: Period,
        year: i32,
        recorded_at: DateTime<Utc>,
        snapshot: &PeriodSnapshot,
    ) -> Result<(), AppError> {
        use entity::hall_of_fame::Column;

        // Build list of columns to update on conflict
        let mut update_columns = vec![Column::RecordedAt];
        if snapshot.climber.is_some() {
            update_columns.push(Column::Climber);
        }
        if snapshot.host.is_some() {
            update_columns.push(Column::Host);
        }
        if snapshot.explorer.is_some() {
            update_columns.push(Column::Explorer);
        }

        let to_json = |champion| serde_json::to_value(champion).ok();

        entity::prelude::HallOfFame::insert(entity::hall_of_fame::ActiveModel {
            id: ActiveValue::Set(record_id.to_string()),
            period: ActiveValue::Set(period.as_str().to_string()),
            year: ActiveValue::Set(year),
            recorded_at: ActiveValue::Set(recorded_at),
            climber: ActiveValue::Set(snapshot.climber.as_ref().and_then(to_json)),
            host: ActiveValue::Set(snapshot.host.as_ref().and_then(to_json)),
            explorer: ActiveValue::Set(snapshot.explorer.as_ref().and_then(to_json)),
        })
        .on_conflict(
            OnConflict::column(Column::Id)
                .update_columns(update_columns)
                .to_owned(),
        )
        .exec(self.db)
        .await?;

        Ok(())
    }

    /// Finds a hall-of-fame record by its key.
    ///
    /// # Arguments
    /// - `record_id` - Record key
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - Record found
    /// - `Ok(None)` - No record with that key
    /// - `Err(AppError)` - Database error during query
    pub async fn find_by_id(
        &self,
        record_id: &str,
    ) -> Result<Option<entity::hall_of_fame::Model>, AppError> {
        let entity = entity::prelude::HallOfFame::find_by_id(record_id)
            .one(self.db)
            .await?;

        Ok(entity)
    }
}
