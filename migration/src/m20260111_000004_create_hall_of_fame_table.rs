use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HallOfFame::Table)
                    .if_not_exists()
                    .col(string(HallOfFame::Id).primary_key())
                    .col(string(HallOfFame::Period))
                    .col(integer(HallOfFame::Year))
                    .col(timestamp_with_time_zone(HallOfFame::RecordedAt))
                    .col(json_null(HallOfFame::Climber))
                    .col(json_null(HallOfFame::Host))
                    .col(json_null(HallOfFame::Explorer))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HallOfFame::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum HallOfFame {
    Table,
    Id,
    Period,
    Year,
    RecordedAt,
    Climber,
    Host,
    Explorer,
}
