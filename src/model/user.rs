//! Ledger domain model and the arithmetic rules for points mutations.
//!
//! `UserRecord` is the single source of truth for a member's progression. The
//! four-action arithmetic lives here as pure methods so every call site
//! (verified-user commands, linked-Discord commands, batch flows) shares one
//! implementation; the service layer only orchestrates load, mutate, save.

use std::collections::BTreeMap;

use sea_orm::ActiveValue;

use crate::error::{internal::InternalError, AppError};
use crate::model::points::{ActionContext, PointsAction};

/// Progression state for one Roblox identity.
///
/// Every numeric field is non-negative. The history maps never hold zero
/// counts: a decrement that reaches zero removes the key. Saving a record
/// replaces the whole row (see `into_active_model`), which is what makes the
/// key removal stick.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Immutable Roblox user ID, primary key.
    pub roblox_id: String,
    /// Roblox username, refreshed on demand.
    pub roblox_username: String,
    /// Linked Discord ID, set once on verification.
    pub discord_id: Option<String>,
    /// Cumulative Lunar Points.
    pub xp: i64,
    pub weekly_xp: i64,
    pub monthly_xp: i64,
    /// Cumulative hosting points.
    pub guide_points: i64,
    pub weekly_guide_points: i64,
    pub monthly_guide_points: i64,
    pub sar_points: i64,
    /// Completed expedition count.
    pub expeditions: i64,
    pub weekly_expeditions: i64,
    pub monthly_expeditions: i64,
    /// Mountain name -> completion count. No zero entries.
    pub expedition_history: BTreeMap<String, i64>,
    /// Difficulty tier -> completion count. No zero entries.
    pub difficulty_stats: BTreeMap<String, i64>,
    pub is_verified: bool,
    pub achievements: Vec<String>,
}

impl UserRecord {
    /// A zeroed record for a freshly seen identity.
    ///
    /// Used when a points grant or verification touches a Roblox ID with no
    /// existing row (auto-vivification).
    pub fn new(roblox_id: impl Into<String>, roblox_username: impl Into<String>) -> Self {
        Self {
            roblox_id: roblox_id.into(),
            roblox_username: roblox_username.into(),
            discord_id: None,
            xp: 0,
            weekly_xp: 0,
            monthly_xp: 0,
            guide_points: 0,
            weekly_guide_points: 0,
            monthly_guide_points: 0,
            sar_points: 0,
            expeditions: 0,
            weekly_expeditions: 0,
            monthly_expeditions: 0,
            expedition_history: BTreeMap::new(),
            difficulty_stats: BTreeMap::new(),
            is_verified: false,
            achievements: Vec::new(),
        }
    }

    /// Applies a climbing-points action.
    ///
    /// `amount` must already be validated non-negative by the caller. `Add`
    /// and `Remove` move the expedition counters and history maps in lockstep
    /// with the points; `Set` overwrites only the cumulative total; `Bonus`
    /// moves the three point fields and nothing else.
    pub fn apply_points(&mut self, action: PointsAction, amount: i64, context: &ActionContext) {
        match action {
            PointsAction::Add => {
                self.xp += amount;
                self.weekly_xp += amount;
                self.monthly_xp += amount;
                self.expeditions += 1;
                self.weekly_expeditions += 1;
                self.monthly_expeditions += 1;

                if let Some(mountain) = &context.mountain {
                    increment(&mut self.expedition_history, mountain);
                }
                if let Some(difficulty) = context.difficulty {
                    increment(&mut self.difficulty_stats, difficulty.as_str());
                }
            }
            PointsAction::Remove => {
                self.xp = (self.xp - amount).max(0);
                self.weekly_xp = (self.weekly_xp - amount).max(0);
                self.monthly_xp = (self.monthly_xp - amount).max(0);
                self.expeditions = (self.expeditions - 1).max(0);
                self.weekly_expeditions = (self.weekly_expeditions - 1).max(0);
                self.monthly_expeditions = (self.monthly_expeditions - 1).max(0);

                if let Some(mountain) = &context.mountain {
                    decrement(&mut self.expedition_history, mountain);
                }
                if let Some(difficulty) = context.difficulty {
                    decrement(&mut self.difficulty_stats, difficulty.as_str());
                }
            }
            // Correction operation: rolling windows and expedition counters
            // are deliberately left untouched.
            PointsAction::Set => {
                self.xp = amount;
            }
            PointsAction::Bonus => {
                self.xp += amount;
                self.weekly_xp += amount;
                self.monthly_xp += amount;
            }
        }
    }

    /// Applies a guide-points action.
    ///
    /// Identical four-action shape over the guide fields, with no expedition
    /// or history coupling.
    pub fn apply_guide(&mut self, action: PointsAction, amount: i64) {
        match action {
            PointsAction::Add => {
                self.guide_points += amount;
                self.weekly_guide_points += amount;
                self.monthly_guide_points += amount;
            }
            PointsAction::Remove => {
                self.guide_points = (self.guide_points - amount).max(0);
                self.weekly_guide_points = (self.weekly_guide_points - amount).max(0);
                self.monthly_guide_points = (self.monthly_guide_points - amount).max(0);
            }
            PointsAction::Set => {
                self.guide_points = amount;
            }
            PointsAction::Bonus => {
                self.guide_points += amount;
                self.weekly_guide_points += amount;
                self.monthly_guide_points += amount;
            }
        }
    }

    /// Converts an entity row to the domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(UserRecord)` - The converted record
    /// - `Err(AppError::InternalErr(CorruptJsonColumn))` - A JSON column held
    ///   a value of the wrong shape
    pub fn from_entity(entity: entity::user::Model) -> Result<Self, AppError> {
        let expedition_history = decode_map(entity.expedition_history, "expedition_history")?;
        let difficulty_stats = decode_map(entity.difficulty_stats, "difficulty_stats")?;
        let achievements: Vec<String> = serde_json::from_value(entity.achievements)
            .map_err(|e| InternalError::CorruptJsonColumn {
                column: "achievements",
                source: e,
            })?;

        Ok(Self {
            roblox_id: entity.roblox_id,
            roblox_username: entity.roblox_username,
            discord_id: entity.discord_id,
            xp: entity.xp,
            weekly_xp: entity.weekly_xp,
            monthly_xp: entity.monthly_xp,
            guide_points: entity.guide_points,
            weekly_guide_points: entity.weekly_guide_points,
            monthly_guide_points: entity.monthly_guide_points,
            sar_points: entity.sar_points,
            expeditions: entity.expeditions,
            weekly_expeditions: entity.weekly_expeditions,
            monthly_expeditions: entity.monthly_expeditions,
            expedition_history,
            difficulty_stats,
            is_verified: entity.is_verified,
            achievements,
        })
    }

    /// Converts the record to an active model with every column set.
    ///
    /// Saves must replace the whole row, not merge columns: a merge write
    /// would resurrect history keys that a remove action pruned.
    pub fn into_active_model(self) -> entity::user::ActiveModel {
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
            sar_points: ActiveValue::Set(self.sar_points),
            expeditions: ActiveValue::Set(self.expeditions),
            weekly_expeditions: ActiveValue::Set(self.weekly_expeditions),
            monthly_expeditions: ActiveValue::Set(self.monthly_expeditions),
            expedition_history: ActiveValue::Set(
                serde_json::to_value(&self.expedition_history).unwrap_or_default(),
            ),
            difficulty_stats: ActiveValue::Set(
                serde_json::to_value(&self.difficulty_stats).unwrap_or_default(),
            ),
            is_verified: ActiveValue::Set(self.is_verified),
            achievements: ActiveValue::Set(
                serde_json::to_value(&self.achievements).unwrap_or_default(),
            ),
        }
    }
}

fn decode_map(
    value: serde_json::Value,
    column: &'static str,
) -> Result<BTreeMap<String, i64>, AppError> {
    serde_json::from_value(value)
        .map_err(|e| InternalError::CorruptJsonColumn { column, source: e }.into())
}

fn increment(map: &mut BTreeMap<String, i64>, key: &str) {
    *map.entry(key.to_string()).or_insert(0) += 1;
}

fn decrement(map: &mut BTreeMap<String, i64>, key: &str) {
    if let Some(count) = map.get_mut(key) {
        *count -= 1;
        if *count <= 0 {
            map.remove(key);
        }
    }
}
