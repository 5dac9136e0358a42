use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::{
    denylist::{MemoryDenylist, PgDenylist, TokenDenylist},
    jwt::JwtKeys,
    repo::{MemoryUserStore, PgUserStore, UserStore},
    AuthService,
};
use crate::characters::repo::{CharacterStore, MemoryCharacterStore, PgCharacterStore};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub characters: Arc<dyn CharacterStore>,
    /// `None` when running on the in-memory stores.
    pub db: Option<PgPool>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self::from_pool(db, config))
    }

    pub fn from_pool(db: PgPool, config: AppConfig) -> Self {
        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let denylist = Arc::new(PgDenylist::new(db.clone())) as Arc<dyn TokenDenylist>;
        let characters = Arc::new(PgCharacterStore::new(db.clone())) as Arc<dyn CharacterStore>;
        Self::from_parts(config, users, denylist, characters, Some(db))
    }

    /// Same wiring over process-local stores; nothing touches Postgres.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::from_parts(
            config,
            Arc::new(MemoryUserStore::default()),
            Arc::new(MemoryDenylist::default()),
            Arc::new(MemoryCharacterStore::default()),
            None,
        )
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        denylist: Arc<dyn TokenDenylist>,
        characters: Arc<dyn CharacterStore>,
        db: Option<PgPool>,
    ) -> Self {
        let keys = JwtKeys::from_config(&config.jwt);
        Self {
            config: Arc::new(config),
            auth: AuthService::new(users, denylist, keys),
            characters,
            db,
        }
    }
}
