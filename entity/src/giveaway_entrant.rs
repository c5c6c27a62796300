use sea_orm::entity::prelude::*;

/// Entrant set membership for a giveaway.
///
/// The composite primary key (giveaway_id, entrant_id) makes an
/// insert-or-ignore the storage layer's atomic set-append: concurrent joins
/// cannot lose entrants, and a conflicting insert reports that the entrant
/// was already present.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "giveaway_entrant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub giveaway_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub entrant_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::giveaway::Entity",
        from = "Column::GiveawayId",
        to = "super::giveaway::Column::MessageId"
    )]
    Giveaway,
}

impl Related<super::giveaway::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Giveaway.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
