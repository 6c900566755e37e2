use sea_orm_migration::prelude::*;

/// Creates the `profile` table. A profile shares identity with its owning
/// user (1:1), so `user_id` is the primary key.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Profile {
    Table,
    UserId,
    DisplayName,
    City,
    Country,
    Gender,
    WeightKg,
    HeightCm,
    Age,
    Bio,
    CreatedAt,
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
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profile::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Profile::DisplayName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Profile::City).string_len(100).null())
                    .col(ColumnDef::new(Profile::Country).string_len(100).null())
                    .col(ColumnDef::new(Profile::Gender).string_len(50).null())
                    .col(ColumnDef::new(Profile::WeightKg).double().null())
                    .col(ColumnDef::new(Profile::HeightCm).double().null())
                    .col(ColumnDef::new(Profile::Age).integer().null())
                    .col(ColumnDef::new(Profile::Bio).text().null())
                    .col(
                        ColumnDef::new(Profile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user_id")
                            .from(Profile::Table, Profile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}
