pub mod api;
pub mod config;
pub mod db;

pub use db::DbPool;

use config::Config;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        Self { config, db }
    }
}

/// Fresh state over an in-memory database for handler tests
#[cfg(test)]
pub(crate) async fn test_state() -> std::sync::Arc<AppState> {
    let pool = db::init_test().await;
    std::sync::Arc::new(AppState::new(Config::default(), pool))
}
