//! Application state shared across routes

use std::sync::Arc;
use std::time::Instant;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::store::ProductStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub products: ProductStore,
    /// When the state was built, reported as uptime by `/health`
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self {
            config: Arc::new(config),
            products: ProductStore::new(pool),
            started_at: Instant::now(),
        }
    }
}
