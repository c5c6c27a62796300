use sea_orm::entity::prelude::*;

/// One giveaway, keyed by the Discord message ID of its announcement.
///
/// `ended` only ever flips false -> true. `winners` is an ordered JSON list of
/// entrant IDs that grows on the initial draw and on every reroll; entries are
/// never removed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "giveaway")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub message_id: String,
    pub channel_id: String,
    pub guild_id: String,
    pub prize: String,
    pub winner_count: i32,
    /// End of the entry phase, epoch milliseconds.
    pub end_time: i64,
    pub sponsor_id: Option<String>,
    pub required_role_id: Option<String>,
    pub ended: bool,
    pub winners: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::giveaway_entrant::Entity")]
    GiveawayEntrant,
}

impl Related<super::giveaway_entrant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GiveawayEntrant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
