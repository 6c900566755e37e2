use sea_orm_migration::prelude::*;

/// Creates the `user_monthly_stats` table: one rollup row per user per
/// calendar month, keyed by (user_id, year, month).
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum UserMonthlyStats {
    Table,
    UserId,
    Year,
    Month,
    TotalDistanceM,
    TotalDurationSec,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserMonthlyStats::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserMonthlyStats::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserMonthlyStats::Year).integer().not_null())
                    .col(ColumnDef::new(UserMonthlyStats::Month).integer().not_null())
                    .col(
                        ColumnDef::new(UserMonthlyStats::TotalDistanceM)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(UserMonthlyStats::TotalDurationSec)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserMonthlyStats::UserId)
                            .col(UserMonthlyStats::Year)
                            .col(UserMonthlyStats::Month),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_monthly_stats_user_id")
                            .from(UserMonthlyStats::Table, UserMonthlyStats::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserMonthlyStats::Table).to_owned())
            .await
    }
}
