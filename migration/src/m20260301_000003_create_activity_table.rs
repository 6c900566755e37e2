use sea_orm_migration::prelude::*;

/// Creates the `activity` table for recorded workouts.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Activity {
    Table,
    Id,
    UserId,
    ActivityType,
    DurationSec,
    DistanceM,
    ElevationGainM,
    Height,
    StartTime,
    EndTime,
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
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activity::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activity::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Activity::ActivityType)
                            .string_len(50)
                            .not_null()
                            .default("other"),
                    )
                    .col(ColumnDef::new(Activity::DurationSec).double().not_null())
                    .col(ColumnDef::new(Activity::DistanceM).double().not_null())
                    .col(
                        ColumnDef::new(Activity::ElevationGainM)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Activity::Height).integer().not_null())
                    .col(
                        ColumnDef::new(Activity::StartTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Activity::EndTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_user_id")
                            .from(Activity::Table, Activity::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activity::Table).to_owned())
            .await
    }
}
