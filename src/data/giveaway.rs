//! Giveaway repository for database operations.
//!
//! Manages giveaway rows and their entrant sets. The entrant append relies on
//! the composite primary key of `giveaway_entrant` for atomicity; everything
//! else is plain row-at-a-time access keyed by the announcement message ID.

use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::error::AppError;
use crate::model::giveaway::Giveaway;

/// Repository providing database operations for giveaways.
pub struct GiveawayRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GiveawayRepository<'a> {
    /// Creates a new GiveawayRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `GiveawayRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new giveaway in the OPEN state.
    ///
    /// # Arguments
    /// - `giveaway` - The giveaway to persist
    ///
    /// # Returns
    /// - `Ok(Giveaway)` - The persisted giveaway as read back
    /// - `Err(AppError)` - Database error during insert
    pub async fn create(&self, giveaway: Giveaway) -> Result<Giveaway, AppError> {
        let entity = entity::prelude::Giveaway::insert(giveaway.into_active_model())
            .exec_with_returning(self.db)
            .await?;

        Giveaway::from_entity(entity)
    }

    /// Finds a giveaway by its announcement message ID.
    ///
    /// # Arguments
    /// - `message_id` - Discord message ID the giveaway is keyed by
    ///
    /// # Returns
    /// - `Ok(Some(Giveaway))` - Giveaway found and converted
    /// - `Ok(None)` - No giveaway with that message ID
    /// - `Err(AppError)` - Database error or corrupt winners column
    pub async fn find_by_message_id(&self, message_id: &str) -> Result<Option<Giveaway>, AppError> {
        let entity = entity::prelude::Giveaway::find_by_id(message_id)
            .one(self.db)
            .await?;

        entity.map(Giveaway::from_entity).transpose()
    }

    /// Finds every open giveaway whose entry deadline has passed.
    ///
    /// The sweep feeds each returned giveaway to `end` independently; `end`
    /// itself stays safe to call on a not-yet-due giveaway for manual early
    /// termination.
    ///
    /// # Arguments
    /// - `now_ms` - Current time in epoch milliseconds
    ///
    /// # Returns
    /// - `Ok(Vec<Giveaway>)` - Due giveaways, possibly empty
    /// - `Err(AppError)` - Database error during query
    pub async fn find_due(&self, now_ms: i64) -> Result<Vec<Giveaway>, AppError> {
        let entities = entity::prelude::Giveaway::find()
            .filter(entity::giveaway::Column::Ended.eq(false))
            .filter(entity::giveaway::Column::EndTime.lte(now_ms))
            .all(self.db)
            .await?;

        entities.into_iter().map(Giveaway::from_entity).collect()
    }

    /// Appends an entrant to a giveaway's entrant set.
    ///
    /// Atomic at the storage layer: the insert either lands exactly once or
    /// conflicts with the composite key. The enclosing `ended` check in the
    /// service and this append are NOT one atomic unit; a join racing an end
    /// can add an entrant after the draw snapshot, in which case the entrant
    /// stays in the set and is considered by future rerolls.
    ///
    /// # Arguments
    /// - `giveaway_id` - Message ID of the giveaway
    /// - `entrant_id` - Discord ID of the joining user
    ///
    /// # Returns
    /// - `Ok(true)` - Entrant appended
    /// - `Ok(false)` - Entrant was already in the set
    /// - `Err(AppError)` - Database error during insert
    pub async fn add_entrant(&self, giveaway_id: &str, entrant_id: &str) -> Result<bool, AppError> {
        let result = entity::prelude::GiveawayEntrant::insert(entity::giveaway_entrant::ActiveModel {
            giveaway_id: ActiveValue::Set(giveaway_id.to_string()),
            entrant_id: ActiveValue::Set(entrant_id.to_string()),
        })
        .on_conflict(
            OnConflict::columns([
                entity::giveaway_entrant::Column::GiveawayId,
                entity::giveaway_entrant::Column::EntrantId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec(self.db)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists a giveaway's entrants.
    ///
    /// # Arguments
    /// - `giveaway_id` - Message ID of the giveaway
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - Entrant Discord IDs, ordered for stable reads
    /// - `Err(AppError)` - Database error during query
    pub async fn entrants(&self, giveaway_id: &str) -> Result<Vec<String>, AppError> {
        let entities = entity::prelude::GiveawayEntrant::find()
            .filter(entity::giveaway_entrant::Column::GiveawayId.eq(giveaway_id))
            .order_by_asc(entity::giveaway_entrant::Column::EntrantId)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(|e| e.entrant_id).collect())
    }

    /// Counts a giveaway's entrants.
    ///
    /// # Arguments
    /// - `giveaway_id` - Message ID of the giveaway
    ///
    /// # Returns
    /// - `Ok(u64)` - Entrant count
    /// - `Err(AppError)` - Database error during count query
    pub async fn entrant_count(&self, giveaway_id: &str) -> Result<u64, AppError> {
        let count = entity::prelude::GiveawayEntrant::find()
            .filter(entity::giveaway_entrant::Column::GiveawayId.eq(giveaway_id))
            .count(self.db)
            .await?;

        Ok(count)
    }

    /// Marks a giveaway ended and stores the drawn winners.
    ///
    /// # Arguments
    /// - `message_id` - Message ID of the giveaway
    /// - `winners` - Winners drawn for the initial end
    ///
    /// # Returns
    /// - `Ok(())` - Giveaway updated
    /// - `Err(AppError)` - Database error during update
    pub async fn mark_ended(&self, message_id: &str, winners: &[String]) -> Result<(), AppError> {
        entity::prelude::Giveaway::update_many()
            .filter(entity::giveaway::Column::MessageId.eq(message_id))
            .col_expr(
                entity::giveaway::Column::Ended,
                sea_orm::sea_query::Expr::value(true),
            )
            .col_expr(
                entity::giveaway::Column::Winners,
                sea_orm::sea_query::Expr::value(serde_json::json!(winners)),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Forces a giveaway into the ended state without touching winners.
    ///
    /// Fail-closed path for a deleted announcement message: the sweep must
    /// never retry the same giveaway forever.
    ///
    /// # Arguments
    /// - `message_id` - Message ID of the giveaway
    ///
    /// # Returns
    /// - `Ok(())` - Giveaway updated
    /// - `Err(AppError)` - Database error during update
    pub async fn force_ended(&self, message_id: &str) -> Result<(), AppError> {
        entity::prelude::Giveaway::update_many()
            .filter(entity::giveaway::Column::MessageId.eq(message_id))
            .col_expr(
                entity::giveaway::Column::Ended,
                sea_orm::sea_query::Expr::value(true),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Overwrites the winner list after a reroll appended to it.
    ///
    /// # Arguments
    /// - `message_id` - Message ID of the giveaway
    /// - `winners` - Full winner list including the newly drawn entries
    ///
    /// # Returns
    /// - `Ok(())` - Giveaway updated
    /// - `Err(AppError)` - Database error during update
    pub async fn set_winners(&self, message_id: &str, winners: &[String]) -> Result<(), AppError> {
        entity::prelude::Giveaway::update_many()
            .filter(entity::giveaway::Column::MessageId.eq(message_id))
            .col_expr(
                entity::giveaway::Column::Winners,
                sea_orm::sea_query::Expr::value(serde_json::json!(winners)),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }
}
