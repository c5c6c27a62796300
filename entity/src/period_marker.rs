use sea_orm::entity::prelude::*;

/// Last-run marker for the period reset jobs.
///
/// One row per period kind ("weekly" / "monthly"). `last_run_key` holds the
/// period key of the most recent completed reset (ISO week or calendar month
/// in the scheduler timezone); a run that computes the same key is skipped.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "period_marker")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub period: String,
    pub last_run_key: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
