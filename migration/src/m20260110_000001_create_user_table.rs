use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(string(User::RobloxId).primary_key())
                    .col(string(User::RobloxUsername))
                    .col(ColumnDef::new(User::DiscordId).string().null().unique_key())
                    .col(big_integer(User::Xp).default(0))
                    .col(big_integer(User::WeeklyXp).default(0))
                    .col(big_integer(User::MonthlyXp).default(0))
                    .col(big_integer(User::GuidePoints).default(0))
                    .col(big_integer(User::WeeklyGuidePoints).default(0))
                    .col(big_integer(User::MonthlyGuidePoints).default(0))
                    .col(big_integer(User::SarPoints).default(0))
                    .col(big_integer(User::Expeditions).default(0))
                    .col(big_integer(User::WeeklyExpeditions).default(0))
                    .col(big_integer(User::MonthlyExpeditions).default(0))
                    .col(json(User::ExpeditionHistory))
                    .col(json(User::DifficultyStats))
                    .col(boolean(User::IsVerified).default(false))
                    .col(json(User::Achievements))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum User {
    Table,
    RobloxId,
    RobloxUsername,
    DiscordId,
    Xp,
    WeeklyXp,
    MonthlyXp,
    GuidePoints,
    WeeklyGuidePoints,
    MonthlyGuidePoints,
    SarPoints,
    Expeditions,
    WeeklyExpeditions,
    MonthlyExpeditions,
    ExpeditionHistory,
    DifficultyStats,
    IsVerified,
    Achievements,
}
