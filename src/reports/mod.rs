//! Aggregate reporting over the full entity set.
//!
//! Nothing here is cached or maintained incrementally; every report is
//! recomputed from the live tables at request time.

pub mod datasets;
pub mod describe;

use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::error::AppError;
use crate::services::activity_service::ActivityOverview;
use crate::services::comment_service::CommentCount;
use crate::services::follower_service::FollowerCount;
use crate::services::kudos_service::KudosCount;
use crate::services::profile_service::ProfileOverview;
use crate::services::stats_service::DistanceLeader;
use crate::services::user_service::UserOverview;
use crate::services::{
    ActivityService, CommentService, FollowerService, KudosService, ProfileService, StatsService,
    UserService,
};

/// How many entries the most-followed leaderboard carries.
const TOP_FOLLOWED_LIMIT: u64 = 10;

/// The combined point-in-time summary served by the global stats endpoint.
#[derive(Debug, Serialize)]
pub struct GlobalStatsReport {
    pub activities_overview: ActivityOverview,
    pub profiles_overview: ProfileOverview,
    pub users_overview: UserOverview,
    pub most_commented_activities: Vec<CommentCount>,
    pub most_liked_activities: Vec<KudosCount>,
    pub most_followed_users: Vec<FollowerCount>,
    pub global_distance_leaderboard: Vec<DistanceLeader>,
}

/// Assemble the global report, or `None` when there is no activity data to
/// report on.
pub async fn global_stats(
    db: &DatabaseConnection,
) -> Result<Option<GlobalStatsReport>, AppError> {
    let activities_overview = ActivityService::overview(db).await?;
    if activities_overview.total_activities == 0 {
        return Ok(None);
    }

    let profiles_overview = ProfileService::overview(db).await?;
    let users_overview = UserService::overview(db).await?;
    let most_commented_activities = CommentService::most_commented(db).await?;
    let most_liked_activities = KudosService::most_kudosed(db).await?;
    let most_followed_users = FollowerService::top_followed(db, Some(TOP_FOLLOWED_LIMIT)).await?;
    let global_distance_leaderboard = StatsService::distance_leaderboard(db).await?;

    Ok(Some(GlobalStatsReport {
        activities_overview,
        profiles_overview,
        users_overview,
        most_commented_activities,
        most_liked_activities,
        most_followed_users,
        global_distance_leaderboard,
    }))
}
