use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PeriodMarker::Table)
                    .if_not_exists()
                    .col(string(PeriodMarker::Period).primary_key())
                    .col(string(PeriodMarker::LastRunKey))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PeriodMarker::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum PeriodMarker {
    Table,
    Period,
    LastRunKey,
}
