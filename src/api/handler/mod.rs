// src/api/handler/mod.rs

pub mod auth;
pub mod basculas;
pub mod pacientes;
pub mod status;
pub mod temperaturas;
pub mod usuarios;

use tower_sessions::Session;

use crate::api::middleware::{AuthSource, AuthUser};
use crate::errors::{AppError, AppResult};
use crate::models::database::FlashKind;
use crate::models::AppState;
use crate::services::auth_service::set_flash;

use pacientes::PACIENTE_NOT_FOUND;

/// Sets an info flash for session callers. Token callers never get a session
/// created for them.
pub(crate) async fn flash(user: &AuthUser, session: &Session, text: &str) -> AppResult<()> {
    if user.source == AuthSource::Session {
        set_flash(session, FlashKind::Info, text).await?;
    }
    Ok(())
}

/// 404 unless the patient exists.
pub(crate) async fn ensure_paciente(state: &AppState, paciente_id: i64) -> AppResult<()> {
    match state.pacientes.find(paciente_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(PACIENTE_NOT_FOUND.to_string())),
    }
}
