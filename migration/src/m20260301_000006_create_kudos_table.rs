use sea_orm_migration::prelude::*;

/// Creates the `kudos` table. One kudos per user per activity, enforced by
/// a unique index over (activity_id, user_id).
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Kudos {
    Table,
    Id,
    ActivityId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Activity {
    Table,
    Id,
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
                    .table(Kudos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Kudos::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Kudos::ActivityId).uuid().not_null())
                    .col(ColumnDef::new(Kudos::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Kudos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kudos_activity_id")
                            .from(Kudos::Table, Kudos::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kudos_user_id")
                            .from(Kudos::Table, Kudos::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_kudos_activity_user")
                    .table(Kudos::Table)
                    .col(Kudos::ActivityId)
                    .col(Kudos::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Kudos::Table).to_owned())
            .await
    }
}
