pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_user_table;
mod m20260301_000002_create_profile_table;
mod m20260301_000003_create_activity_table;
mod m20260301_000004_create_activity_point_table;
mod m20260301_000005_create_comment_table;
mod m20260301_000006_create_kudos_table;
mod m20260301_000007_create_follower_table;
mod m20260301_000008_create_user_monthly_stats_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_user_table::Migration),
            Box::new(m20260301_000002_create_profile_table::Migration),
            Box::new(m20260301_000003_create_activity_table::Migration),
            Box::new(m20260301_000004_create_activity_point_table::Migration),
            Box::new(m20260301_000005_create_comment_table::Migration),
            Box::new(m20260301_000006_create_kudos_table::Migration),
            Box::new(m20260301_000007_create_follower_table::Migration),
            Box::new(m20260301_000008_create_user_monthly_stats_table::Migration),
        ]
    }
}
