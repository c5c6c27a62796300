use sea_orm::entity::prelude::*;

/// Period champion record, one row per elapsed week or month.
///
/// Keyed `weekly-YYYY-MM-DD` (week start) or `monthly-YYYY-MM`. The three
/// category payloads are written with column-merge semantics so recording one
/// champion never clobbers another already stored for the same period.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hall_of_fame")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub period: String,
    pub year: i32,
    pub recorded_at: DateTimeUtc,
    pub climber: Option<Json>,
    pub host: Option<Json>,
    pub explorer: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
