use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AuthConfig, Config, SessionConfig};
use crate::db::{
    self, BasculaStore, InMemoryStore, PacienteStore, PgStore, StoreResult, TemperaturaStore,
    UserStore,
};
use crate::services::auth_service::{PasswordHasher, TokenIssuer};

/// Everything a handler needs, shared behind one `Arc`.
pub struct AppState {
    pub usuarios: Arc<dyn UserStore>,
    pub pacientes: Arc<dyn PacienteStore>,
    pub basculas: Arc<dyn BasculaStore>,
    pub temperaturas: Arc<dyn TemperaturaStore>,
    pub tokens: TokenIssuer,
    pub passwords: PasswordHasher,
    pub session: SessionConfig,
}

impl AppState {
    /// Builds the state over one backend that serves every record family.
    pub fn new<S>(store: Arc<S>, auth: &AuthConfig, session: SessionConfig) -> Self
    where
        S: UserStore + PacienteStore + BasculaStore + TemperaturaStore + 'static,
    {
        AppState {
            usuarios: store.clone(),
            pacientes: store.clone(),
            basculas: store.clone(),
            temperaturas: store,
            tokens: TokenIssuer::new(&auth.jwt_secret, auth.token_ttl),
            passwords: PasswordHasher::new(auth.bcrypt_cost),
            session,
        }
    }

    pub fn in_memory(auth: &AuthConfig, session: SessionConfig) -> Self {
        AppState::new(Arc::new(InMemoryStore::new()), auth, session)
    }

    /// Opens PostgreSQL and applies migrations when `DATABASE_URL` is set,
    /// otherwise falls back to process memory.
    pub async fn from_config(config: &Config) -> StoreResult<Self> {
        let Some(url) = config.database.url.as_deref() else {
            warn!("DATABASE_URL not set, records are kept in memory and lost on restart");
            return Ok(AppState::in_memory(&config.auth, config.session.clone()));
        };
        let pool = db::connect(url, &config.database).await?;
        db::migrate(&pool).await?;
        info!("Using PostgreSQL storage");
        let store = Arc::new(PgStore::new(pool, config.database.timeout));
        Ok(AppState::new(store, &config.auth, config.session.clone()))
    }
}
