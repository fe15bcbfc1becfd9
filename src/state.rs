use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::warn;

use crate::auth::session::SessionStore;
use crate::config::AppConfig;
use crate::pages::PageRenderer;
use crate::users::{MemoryUserStore, PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub sessions: SessionStore,
    pub pages: PageRenderer,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            warn!(error = %e, "migration failed; continuing");
        }

        let users = Arc::new(PgUserStore::new(pool)) as Arc<dyn UserStore>;
        Ok(Self::from_parts(users, config))
    }

    pub fn from_parts(users: Arc<dyn UserStore>, config: Arc<AppConfig>) -> Self {
        let pages = PageRenderer::new(&config.static_dir);
        Self {
            users,
            sessions: SessionStore::new(),
            pages,
            config,
        }
    }

    /// State over the in-memory store: no database, no environment. Tests
    /// drive the full router against this.
    pub fn in_memory() -> Self {
        let config = Arc::new(AppConfig {
            database_url: "postgres://unused".into(),
            static_dir: "static".into(),
        });
        Self::from_parts(Arc::new(MemoryUserStore::new()), config)
    }
}
