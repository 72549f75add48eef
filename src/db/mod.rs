//! Persistence seams.
//!
//! Each record family has its own store trait; [`PgStore`] implements all of
//! them over one PostgreSQL pool and [`InMemoryStore`] implements all of them
//! over process memory (used when no `DATABASE_URL` is configured and in
//! tests).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::models::database::{
    Bascula, MedicionBascula, MedicionTemperatura, NuevoPaciente, NuevoUsuario, Paciente,
    Temperatura, Usuario,
};

pub use memory::InMemoryStore;
pub use postgres::{connect, migrate, PgStore};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A foreign key pointed at a row that does not exist.
    #[error("foreign key violated: {0}")]
    MissingReference(String),

    #[error("database call timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid stored value: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::Conflict(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(constraint);
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Runs one database call with an upper bound on its duration.
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

/// Credential store. Usernames are unique and matched case-sensitively; the
/// uniqueness guarantee lives here, not in callers.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Usuario>>;
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Usuario>>;
    /// Fails with [`StoreError::Conflict`] when the username is taken.
    async fn create(&self, nuevo: NuevoUsuario) -> StoreResult<i64>;
    async fn list(&self) -> StoreResult<Vec<Usuario>>;
}

#[async_trait]
pub trait PacienteStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Paciente>>;
    async fn find(&self, id: i64) -> StoreResult<Option<Paciente>>;
    async fn create(&self, nuevo: NuevoPaciente) -> StoreResult<i64>;
    /// Returns `false` when no row had that id.
    async fn update(&self, id: i64, datos: NuevoPaciente) -> StoreResult<bool>;
    /// Also removes the patient's measurements.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait BasculaStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Bascula>>;
    /// Newest first.
    async fn list_by_paciente(&self, paciente_id: i64) -> StoreResult<Vec<Bascula>>;
    async fn latest_for_paciente(&self, paciente_id: i64) -> StoreResult<Option<Bascula>>;
    async fn find(&self, id: i64) -> StoreResult<Option<Bascula>>;
    async fn create(&self, paciente_id: i64, medicion: MedicionBascula) -> StoreResult<i64>;
    async fn update(&self, id: i64, medicion: MedicionBascula) -> StoreResult<bool>;
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait TemperaturaStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Temperatura>>;
    /// Newest first.
    async fn list_by_paciente(&self, paciente_id: i64) -> StoreResult<Vec<Temperatura>>;
    async fn find(&self, id: i64) -> StoreResult<Option<Temperatura>>;
    async fn create(&self, paciente_id: i64, medicion: MedicionTemperatura) -> StoreResult<i64>;
    async fn update(&self, id: i64, medicion: MedicionTemperatura) -> StoreResult<bool>;
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}
