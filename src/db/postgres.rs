use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use super::{
    bounded, BasculaStore, PacienteStore, StoreError, StoreResult, TemperaturaStore, UserStore,
};
use crate::config::DatabaseConfig;
use crate::models::database::{
    Bascula, MedicionBascula, MedicionTemperatura, NuevoPaciente, NuevoUsuario, Paciente,
    Temperatura, Usuario,
};

pub async fn connect(url: &str, config: &DatabaseConfig) -> StoreResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.timeout)
        .connect(url)
        .await?;
    info!(max_connections = config.max_connections, "Database pool opened");
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> StoreResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// PostgreSQL-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        PgStore { pool, timeout }
    }
}

#[derive(sqlx::FromRow)]
struct UsuarioRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    rol: String,
}

impl TryFrom<UsuarioRow> for Usuario {
    type Error = StoreError;

    fn try_from(row: UsuarioRow) -> Result<Self, Self::Error> {
        let rol = row
            .rol
            .parse()
            .map_err(|e| StoreError::Decode(format!("usuario {}: {}", row.id, e)))?;
        Ok(Usuario {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            rol,
        })
    }
}

const USUARIO_COLUMNS: &str = "id, username, email, password_hash, rol";

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Usuario>> {
        let sql = format!("SELECT {} FROM usuarios WHERE id = $1", USUARIO_COLUMNS);
        let row = bounded(
            self.timeout,
            sqlx::query_as::<_, UsuarioRow>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?;
        row.map(Usuario::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Usuario>> {
        let sql = format!(
            "SELECT {} FROM usuarios WHERE username = $1",
            USUARIO_COLUMNS
        );
        let row = bounded(
            self.timeout,
            sqlx::query_as::<_, UsuarioRow>(&sql)
                .bind(username)
                .fetch_optional(&self.pool),
        )
        .await?;
        row.map(Usuario::try_from).transpose()
    }

    async fn create(&self, nuevo: NuevoUsuario) -> StoreResult<i64> {
        bounded(
            self.timeout,
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO usuarios (username, password_hash, email, rol) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(&nuevo.username)
            .bind(&nuevo.password_hash)
            .bind(&nuevo.email)
            .bind(nuevo.rol.as_str())
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn list(&self) -> StoreResult<Vec<Usuario>> {
        let sql = format!("SELECT {} FROM usuarios ORDER BY id", USUARIO_COLUMNS);
        let rows = bounded(
            self.timeout,
            sqlx::query_as::<_, UsuarioRow>(&sql).fetch_all(&self.pool),
        )
        .await?;
        rows.into_iter().map(Usuario::try_from).collect()
    }
}

#[async_trait]
impl PacienteStore for PgStore {
    async fn list(&self) -> StoreResult<Vec<Paciente>> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Paciente>(
                "SELECT id, nombre, apellido, fecha_nacimiento, sexo FROM pacientes ORDER BY id",
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Paciente>> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Paciente>(
                "SELECT id, nombre, apellido, fecha_nacimiento, sexo FROM pacientes WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn create(&self, nuevo: NuevoPaciente) -> StoreResult<i64> {
        bounded(
            self.timeout,
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO pacientes (nombre, apellido, fecha_nacimiento, sexo) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(&nuevo.nombre)
            .bind(&nuevo.apellido)
            .bind(nuevo.fecha_nacimiento)
            .bind(&nuevo.sexo)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn update(&self, id: i64, datos: NuevoPaciente) -> StoreResult<bool> {
        let result = bounded(
            self.timeout,
            sqlx::query(
                "UPDATE pacientes SET nombre = $1, apellido = $2, fecha_nacimiento = $3, sexo = $4 \
                 WHERE id = $5",
            )
            .bind(&datos.nombre)
            .bind(&datos.apellido)
            .bind(datos.fecha_nacimiento)
            .bind(&datos.sexo)
            .bind(id)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = bounded(
            self.timeout,
            sqlx::query("DELETE FROM pacientes WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

const BASCULA_COLUMNS: &str = "id, paciente_id, peso, altura, fecha_registro";

#[async_trait]
impl BasculaStore for PgStore {
    async fn list(&self) -> StoreResult<Vec<Bascula>> {
        let sql = format!(
            "SELECT {} FROM basculas ORDER BY fecha_registro DESC, id DESC",
            BASCULA_COLUMNS
        );
        bounded(
            self.timeout,
            sqlx::query_as::<_, Bascula>(&sql).fetch_all(&self.pool),
        )
        .await
    }

    async fn list_by_paciente(&self, paciente_id: i64) -> StoreResult<Vec<Bascula>> {
        let sql = format!(
            "SELECT {} FROM basculas WHERE paciente_id = $1 ORDER BY fecha_registro DESC, id DESC",
            BASCULA_COLUMNS
        );
        bounded(
            self.timeout,
            sqlx::query_as::<_, Bascula>(&sql)
                .bind(paciente_id)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn latest_for_paciente(&self, paciente_id: i64) -> StoreResult<Option<Bascula>> {
        let sql = format!(
            "SELECT {} FROM basculas WHERE paciente_id = $1 \
             ORDER BY fecha_registro DESC, id DESC LIMIT 1",
            BASCULA_COLUMNS
        );
        bounded(
            self.timeout,
            sqlx::query_as::<_, Bascula>(&sql)
                .bind(paciente_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Bascula>> {
        let sql = format!("SELECT {} FROM basculas WHERE id = $1", BASCULA_COLUMNS);
        bounded(
            self.timeout,
            sqlx::query_as::<_, Bascula>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn create(&self, paciente_id: i64, medicion: MedicionBascula) -> StoreResult<i64> {
        bounded(
            self.timeout,
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO basculas (paciente_id, peso, altura, fecha_registro) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(paciente_id)
            .bind(medicion.peso)
            .bind(medicion.altura)
            .bind(medicion.fecha_registro)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn update(&self, id: i64, medicion: MedicionBascula) -> StoreResult<bool> {
        let result = bounded(
            self.timeout,
            sqlx::query(
                "UPDATE basculas SET peso = $1, altura = $2, fecha_registro = $3 WHERE id = $4",
            )
            .bind(medicion.peso)
            .bind(medicion.altura)
            .bind(medicion.fecha_registro)
            .bind(id)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = bounded(
            self.timeout,
            sqlx::query("DELETE FROM basculas WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

const TEMPERATURA_COLUMNS: &str = "id, paciente_id, temperatura, fecha_registro";

#[async_trait]
impl TemperaturaStore for PgStore {
    async fn list(&self) -> StoreResult<Vec<Temperatura>> {
        let sql = format!(
            "SELECT {} FROM temperaturas ORDER BY fecha_registro DESC, id DESC",
            TEMPERATURA_COLUMNS
        );
        bounded(
            self.timeout,
            sqlx::query_as::<_, Temperatura>(&sql).fetch_all(&self.pool),
        )
        .await
    }

    async fn list_by_paciente(&self, paciente_id: i64) -> StoreResult<Vec<Temperatura>> {
        let sql = format!(
            "SELECT {} FROM temperaturas WHERE paciente_id = $1 \
             ORDER BY fecha_registro DESC, id DESC",
            TEMPERATURA_COLUMNS
        );
        bounded(
            self.timeout,
            sqlx::query_as::<_, Temperatura>(&sql)
                .bind(paciente_id)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn find(&self, id: i64) -> StoreResult<Option<Temperatura>> {
        let sql = format!(
            "SELECT {} FROM temperaturas WHERE id = $1",
            TEMPERATURA_COLUMNS
        );
        bounded(
            self.timeout,
            sqlx::query_as::<_, Temperatura>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn create(&self, paciente_id: i64, medicion: MedicionTemperatura) -> StoreResult<i64> {
        bounded(
            self.timeout,
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO temperaturas (paciente_id, temperatura, fecha_registro) \
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(paciente_id)
            .bind(medicion.temperatura)
            .bind(medicion.fecha_registro)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn update(&self, id: i64, medicion: MedicionTemperatura) -> StoreResult<bool> {
        let result = bounded(
            self.timeout,
            sqlx::query("UPDATE temperaturas SET temperatura = $1, fecha_registro = $2 WHERE id = $3")
                .bind(medicion.temperatura)
                .bind(medicion.fecha_registro)
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = bounded(
            self.timeout,
            sqlx::query("DELETE FROM temperaturas WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
