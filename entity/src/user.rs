use sea_orm::entity::prelude::*;

/// Ledger row for one Roblox identity.
///
/// The row is keyed by the immutable Roblox user ID. All numeric progression
/// fields are non-negative; the JSON maps (`expedition_history`,
/// `difficulty_stats`) never store zero counts - keys are pruned on the way
/// down, which is why saves replace the whole row instead of merging columns.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub roblox_id: String,
    pub roblox_username: String,
    #[sea_orm(unique)]
    pub discord_id: Option<String>,
    pub xp: i64,
    pub weekly_xp: i64,
    pub monthly_xp: i64,
    pub guide_points: i64,
    pub weekly_guide_points: i64,
    pub monthly_guide_points: i64,
    pub sar_points: i64,
    pub expeditions: i64,
    pub weekly_expeditions: i64,
    pub monthly_expeditions: i64,
    pub expedition_history: Json,
    pub difficulty_stats: Json,
    pub is_verified: bool,
    pub achievements: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
