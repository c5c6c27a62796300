//! Giveaway factory for creating test giveaway rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test giveaways with customizable fields.
///
/// Defaults to an open giveaway ending one hour in the future with a single
/// winner and no role requirement.
pub struct GiveawayFactory<'a> {
    db: &'a DatabaseConnection,
    message_id: String,
    channel_id: String,
    guild_id: String,
    prize: String,
    winner_count: i32,
    end_time: i64,
    sponsor_id: Option<String>,
    required_role_id: Option<String>,
    ended: bool,
    winners: Vec<String>,
}

impl<'a> GiveawayFactory<'a> {
    /// Creates a new GiveawayFactory with default values.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `GiveawayFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            message_id: format!("90000000{}", id),
            channel_id: "1435964396408148088".to_string(),
            guild_id: "1417377384197390000".to_string(),
            prize: "1000 Robux".to_string(),
            winner_count: 1,
            end_time: Utc::now().timestamp_millis() + 3_600_000,
            sponsor_id: None,
            required_role_id: None,
            ended: false,
            winners: Vec::new(),
        }
    }

    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    pub fn prize(mut self, prize: impl Into<String>) -> Self {
        self.prize = prize.into();
        self
    }

    pub fn winner_count(mut self, winner_count: i32) -> Self {
        self.winner_count = winner_count;
        self
    }

    pub fn end_time(mut self, end_time: i64) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn required_role_id(mut self, required_role_id: impl Into<String>) -> Self {
        self.required_role_id = Some(required_role_id.into());
        self
    }

    pub fn ended(mut self, ended: bool) -> Self {
        self.ended = ended;
        self
    }

    pub fn winners(mut self, winners: Vec<String>) -> Self {
        self.winners = winners;
        self
    }

    /// Builds and inserts the giveaway entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::giveaway::Model)` - Created giveaway entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::giveaway::Model, DbErr> {
        entity::giveaway::ActiveModel {
            message_id: ActiveValue::Set(self.message_id),
            channel_id: ActiveValue::Set(self.channel_id),
            guild_id: ActiveValue::Set(self.guild_id),
            prize: ActiveValue::Set(self.prize),
            winner_count: ActiveValue::Set(self.winner_count),
            end_time: ActiveValue::Set(self.end_time),
            sponsor_id: ActiveValue::Set(self.sponsor_id),
            required_role_id: ActiveValue::Set(self.required_role_id),
            ended: ActiveValue::Set(self.ended),
            winners: ActiveValue::Set(serde_json::json!(self.winners)),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an open giveaway with default values.
///
/// Shorthand for `GiveawayFactory::new(db).build().await`.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok(entity::giveaway::Model)` - Created giveaway entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_giveaway(db: &DatabaseConnection) -> Result<entity::giveaway::Model, DbErr> {
    GiveawayFactory::new(db).build().await
}
