use sea_orm_migration::prelude::*;

/// Creates the `activity_point` table for GPS track samples.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ActivityPoint {
    Table,
    Id,
    ActivityId,
    Lat,
    Lon,
    RecordedAt,
    Ele,
    Speed,
    Cadence,
}

#[derive(DeriveIden)]
enum Activity {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityPoint::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityPoint::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityPoint::ActivityId).uuid().not_null())
                    .col(ColumnDef::new(ActivityPoint::Lat).double().not_null())
                    .col(ColumnDef::new(ActivityPoint::Lon).double().not_null())
                    .col(
                        ColumnDef::new(ActivityPoint::RecordedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(ActivityPoint::Ele).double().null())
                    .col(ColumnDef::new(ActivityPoint::Speed).double().null())
                    .col(ColumnDef::new(ActivityPoint::Cadence).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_point_activity_id")
                            .from(ActivityPoint::Table, ActivityPoint::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityPoint::Table).to_owned())
            .await
    }
}
