use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::services::ClientSync;

/// Shared application state available to all request handlers via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    /// Client for the sibling "clients" service.
    pub clients: ClientSync,
}
