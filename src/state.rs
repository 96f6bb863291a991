use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, media::MediaHost, token::TokenKeys};

#[derive(Clone)]
pub struct AppState {
    pub orm: Arc<DatabaseConnection>,
    pub tokens: Arc<TokenKeys>,
    pub media: Arc<dyn MediaHost>,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: &AppConfig, media: Arc<dyn MediaHost>) -> Self {
        Self {
            orm: Arc::new(orm),
            tokens: Arc::new(TokenKeys::new(&config.jwt_secret)),
            media,
            cookie_secure: config.cookie_secure,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.orm
    }
}
