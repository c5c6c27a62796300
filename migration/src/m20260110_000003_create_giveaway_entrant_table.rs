use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260110_000002_create_giveaway_table::Giveaway;

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The entrant set: the composite primary key is what makes the
        // insert-or-ignore append atomic.
        manager
            .create_table(
                Table::create()
                    .table(GiveawayEntrant::Table)
                    .if_not_exists()
                    .col(string(GiveawayEntrant::GiveawayId))
                    .col(string(GiveawayEntrant::EntrantId))
                    .primary_key(
                        Index::create()
                            .col(GiveawayEntrant::GiveawayId)
                            .col(GiveawayEntrant::EntrantId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_giveaway_entrant_giveaway")
                            .from(GiveawayEntrant::Table, GiveawayEntrant::GiveawayId)
                            .to(Giveaway::Table, Giveaway::MessageId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GiveawayEntrant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum GiveawayEntrant {
    Table,
    GiveawayId,
    EntrantId,
}
