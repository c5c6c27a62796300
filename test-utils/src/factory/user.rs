//! User factory for creating test ledger rows.
//!
//! This module provides factory methods for creating user entities with sensible
//! defaults, reducing boilerplate in tests. The factory supports customization
//! through a builder pattern.

use crate::factory::helpers::next_id;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test users with customizable fields.
///
/// Provides a builder pattern for creating user entities with default values
/// that can be overridden as needed for specific test scenarios.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user::UserFactory;
///
/// let user = UserFactory::new(&db)
///     .roblox_id("1001")
///     .xp(500)
///     .weekly_xp(50)
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    roblox_id: String,
    roblox_username: String,
    discord_id: Option<String>,
    xp: i64,
    weekly_xp: i64,
    monthly_xp: i64,
    guide_points: i64,
    weekly_guide_points: i64,
    monthly_guide_points: i64,
    expeditions: i64,
    weekly_expeditions: i64,
    monthly_expeditions: i64,
    is_verified: bool,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - roblox_id: auto-incremented numeric string
    /// - roblox_username: `"Climber{id}"`
    /// - everything else zeroed / unset
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `UserFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            roblox_id: id.to_string(),
            roblox_username: format!("Climber{}", id),
            discord_id: None,
            xp: 0,
            weekly_xp: 0,
            monthly_xp: 0,
            guide_points: 0,
            weekly_guide_points: 0,
            monthly_guide_points: 0,
            expeditions: 0,
            weekly_expeditions: 0,
            monthly_expeditions: 0,
            is_verified: false,
        }
    }

    pub fn roblox_id(mut self, roblox_id: impl Into<String>) -> Self {
        self.roblox_id = roblox_id.into();
        self
    }

    pub fn roblox_username(mut self, roblox_username: impl Into<String>) -> Self {
        self.roblox_username = roblox_username.into();
        self
    }

    pub fn discord_id(mut self, discord_id: impl Into<String>) -> Self {
        self.discord_id = Some(discord_id.into());
        self
    }

    pub fn xp(mut self, xp: i64) -> Self {
        self.xp = xp;
        self
    }

    pub fn weekly_xp(mut self, weekly_xp: i64) -> Self {
        self.weekly_xp = weekly_xp;
        self
    }

    pub fn monthly_xp(mut self, monthly_xp: i64) -> Self {
        self.monthly_xp = monthly_xp;
        self
    }

    pub fn guide_points(mut self, guide_points: i64) -> Self {
        self.guide_points = guide_points;
        self
    }

    pub fn weekly_guide_points(mut self, weekly_guide_points: i64) -> Self {
        self.weekly_guide_points = weekly_guide_points;
        self
    }

    pub fn monthly_guide_points(mut self, monthly_guide_points: i64) -> Self {
        self.monthly_guide_points = monthly_guide_points;
        self
    }

    pub fn expeditions(mut self, expeditions: i64) -> Self {
        self.expeditions = expeditions;
        self
    }

    pub fn weekly_expeditions(mut self, weekly_expeditions: i64) -> Self {
        self.weekly_expeditions = weekly_expeditions;
        self
    }

    pub fn monthly_expeditions(mut self, monthly_expeditions: i64) -> Self {
        self.monthly_expeditions = monthly_expeditions;
        self
    }

    pub fn verified(mut self, is_verified: bool) -> Self {
        self.is_verified = is_verified;
        self
    }

    /// Builds and inserts the user entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            roblox_id: ActiveValue::Set(self.roblox_id),
            roblox_username: ActiveValue::Set(self.roblox_username),
            discord_id: ActiveValue::Set(self.discord_id),
            xp: ActiveValue::Set(self.xp),
            weekly_xp: ActiveValue::Set(self.weekly_xp),
            monthly_xp: ActiveValue::Set(self.monthly_xp),
            guide_points: ActiveValue::Set(self.guide_points),
            weekly_guide_points: ActiveValue::Set(self.weekly_guide_points),
            monthly_guide_points: ActiveValue::Set(self.monthly_guide_points),
            sar_points: ActiveValue::Set(0),
            expeditions: ActiveValue::Set(self.expeditions),
            weekly_expeditions: ActiveValue::Set(self.weekly_expeditions),
            monthly_expeditions: ActiveValue::Set(self.monthly_expeditions),
            expedition_history: ActiveValue::Set(serde_json::json!({})),
            difficulty_stats: ActiveValue::Set(serde_json::json!({})),
            is_verified: ActiveValue::Set(self.is_verified),
            achievements: ActiveValue::Set(serde_json::json!([])),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a user with default values.
///
/// Shorthand for `UserFactory::new(db).build().await`.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok(entity::user::Model)` - Created user entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}
