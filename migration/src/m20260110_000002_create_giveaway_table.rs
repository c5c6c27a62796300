use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Giveaway::Table)
                    .if_not_exists()
                    .col(string(Giveaway::MessageId).primary_key())
                    .col(string(Giveaway::ChannelId))
                    .col(string(Giveaway::GuildId))
                    .col(string(Giveaway::Prize))
                    .col(integer(Giveaway::WinnerCount))
                    .col(big_integer(Giveaway::EndTime))
                    .col(string_null(Giveaway::SponsorId))
                    .col(string_null(Giveaway::RequiredRoleId))
                    .col(boolean(Giveaway::Ended).default(false))
                    .col(json(Giveaway::Winners))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Giveaway::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum Giveaway {
    Table,
    MessageId,
    ChannelId,
    GuildId,
    Prize,
    WinnerCount,
    EndTime,
    SponsorId,
    RequiredRoleId,
    Ended,
    Winners,
}
