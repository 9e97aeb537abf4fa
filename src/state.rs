use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::rate_limit::LoginRateLimiter;
use crate::upload::UploadStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub uploads: UploadStore,
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let uploads = UploadStore::new(config.upload_dir.clone());
        Self {
            pool,
            config,
            uploads,
            login_limiter: LoginRateLimiter::new(),
        }
    }
}
