use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::auth::repo::{MemoryUserRepo, PgUserRepo, UserRepo};
use crate::config::{AppConfig, StoreBackend};
use crate::db;
use crate::posts::repo::{MemoryPostRepo, PgPostRepo, PostRepo};
use crate::profiles::repo::{MemoryProfileRepo, PgProfileRepo, ProfileRepo};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub profiles: Arc<dyn ProfileRepo>,
    pub posts: Arc<dyn PostRepo>,
    pub http: reqwest::Client,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        match &config.store {
            StoreBackend::Postgres { database_url } => {
                let pool = db::connect(database_url).await?;
                db::migrate(&pool).await?;
                info!("using postgres store");
                Ok(Self::with_postgres(config.clone(), pool))
            }
            StoreBackend::Memory => {
                info!("using in-memory store; data is lost on restart");
                Ok(Self::in_memory(config.clone()))
            }
        }
    }

    pub fn with_postgres(config: Arc<AppConfig>, pool: PgPool) -> Self {
        Self {
            config,
            users: Arc::new(PgUserRepo::new(pool.clone())),
            profiles: Arc::new(PgProfileRepo::new(pool.clone())),
            posts: Arc::new(PgPostRepo::new(pool)),
            http: reqwest::Client::new(),
        }
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            users: Arc::new(MemoryUserRepo::default()),
            profiles: Arc::new(MemoryProfileRepo::default()),
            posts: Arc::new(MemoryPostRepo::default()),
            http: reqwest::Client::new(),
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::in_memory(Arc::new(AppConfig::for_tests()))
    }
}
