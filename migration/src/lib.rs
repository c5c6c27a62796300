pub use sea_orm_migration::prelude::*;

mod m20260110_000001_create_user_table;
mod m20260110_000002_create_giveaway_table;
mod m20260110_000003_create_giveaway_entrant_table;
mod m20260111_000004_create_hall_of_fame_table;
mod m20260111_000005_create_period_marker_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000001_create_user_table::Migration),
            Box::new(m20260110_000002_create_giveaway_table::Migration),
            Box::new(m20260110_000003_create_giveaway_entrant_table::Migration),
            Box::new(m20260111_000004_create_hall_of_fame_table::Migration),
            Box::new(m20260111_000005_create_period_marker_table::Migration),
        ]
    }
}
