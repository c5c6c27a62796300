//! Period marker repository.
//!
//! Persists the last-run period key per reset cadence so a restart near a
//! boundary cannot double-fire a reset.

use migration::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::error::AppError;
use crate::model::period::Period;

/// Repository providing database operations for period markers.
pub struct PeriodMarkerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PeriodMarkerRepository<'a> {
    /// Creates a new PeriodMarkerRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `PeriodMarkerRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the period key of the most recent completed reset.
    ///
    /// # Arguments
    /// - `period` - Which cadence to look up
    ///
    /// # Returns
    /// - `Ok(Some(String))` - Key of the last completed run
    /// - `Ok(None)` - This cadence has never run
    /// - `Err(AppError)` - Database error during query
    pub async fn last_run_key(&self, period: Period) -> Result<Option<String>, AppError> {
        let entity = entity::prelude::PeriodMarker::find_by_id(period.as_str())
            .one(self.db)
            .await?;

        Ok(entity.map(|m| m.last_run_key))
    }

    /// Stores the period key of a completed reset.
    ///
    /// # Arguments
    /// - `period` - Which cadence just ran
    /// - `key` - Period key the run computed
    ///
    /// # Returns
    /// - `Ok(())` - Marker stored
    /// - `Err(AppError)` - Database error during upsert
    pub async fn set_last_run(&self, period: Period, key: &str) -> Result<(), AppError> {
        entity::prelude::PeriodMarker::insert(entity::period_marker::ActiveModel {
            period: ActiveValue::Set(period.as_str().to_string()),
            last_run_key: ActiveValue::Set(key.to_string()),
        })
        .on_conflict(
            OnConflict::column(entity::period_marker::Column::Period)
                .update_columns([entity::period_marker::Column::LastRunKey])
                .to_owned(),
        )
        .exec(self.db)
        .await?;

        Ok(())
    }
}
