pub mod activity_service;
pub mod client_sync;
pub mod comment_service;
pub mod follower_service;
pub mod kudos_service;
pub mod point_service;
pub mod profile_service;
pub mod stats_service;
pub mod user_service;

pub use activity_service::ActivityService;
pub use client_sync::ClientSync;
pub use comment_service::CommentService;
pub use follower_service::FollowerService;
pub use kudos_service::KudosService;
pub use point_service::ActivityPointService;
pub use profile_service::ProfileService;
pub use stats_service::StatsService;
pub use user_service::UserService;
