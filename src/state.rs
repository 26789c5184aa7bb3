use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::{jwt::JwtKeys, service::AuthService, store::PgUserStore},
    config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: AuthService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Self::from_parts(db, &config)
    }

    pub fn from_parts(db: PgPool, config: &AppConfig) -> anyhow::Result<Self> {
        let keys = JwtKeys::from_config(&config.jwt)?;
        let auth = AuthService::new(Arc::new(PgUserStore::new(db.clone())), keys);
        Ok(Self { db, auth })
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.auth.keys().clone()
    }
}
