use std::sync::Arc;

use tradein_db::stores::PgStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference counted and the config is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tradein_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Engine store backed by this state's pool.
    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }
}
