mod activities;
mod activity_points;
mod auth;
mod clients;
mod comments;
mod followers;
mod health;
mod kudos;
mod profiles;
mod reports;
mod user_stats;
mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health` — lightweight health check (used by the platform)
/// - `/api/v1/...` — auth, one resource group per entity, reports, analytics,
///   and the external clients proxy
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/profiles", profiles::router())
        .nest("/activities", activities::router())
        .nest("/activity-points", activity_points::router())
        .nest("/comments", comments::router())
        .nest("/kudos", kudos::router())
        .nest("/followers", followers::router())
        .nest("/user-stats", user_stats::router())
        .nest("/reports", reports::router())
        .nest("/analytics", reports::analytics_router())
        .nest("/external/clients", clients::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
