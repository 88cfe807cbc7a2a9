use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::auth::{CredentialHasher, HashError, SessionStore};
use crate::config::AppConfig;
use crate::database::UserRepository;

/// Shared, read-mostly state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub sessions: Arc<SessionStore>,
    pub hasher: Arc<CredentialHasher>,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: SqlitePool) -> Result<Self, HashError> {
        Ok(Self {
            users: UserRepository::new(pool),
            sessions: Arc::new(SessionStore::new(&config.session)),
            hasher: Arc::new(CredentialHasher::new(&config.hasher)?),
        })
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
