use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::info;

use super::flash;
use crate::api::middleware::AuthUser;
use crate::errors::{AppError, AppResult};
use crate::models::api::{PacienteInput, PacienteView};
use crate::models::AppState;

pub const PACIENTE_NOT_FOUND: &str = "Paciente no encontrado";

pub async fn listar(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> AppResult<Json<Value>> {
    let hoy = Utc::now().date_naive();
    let pacientes: Vec<PacienteView> = state
        .pacientes
        .list()
        .await?
        .into_iter()
        .map(|p| PacienteView::at(p, hoy))
        .collect();
    Ok(Json(json!({
        "success": true,
        "total": pacientes.len(),
        "pacientes": pacientes,
    })))
}

pub async fn obtener(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let paciente = state
        .pacientes
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(PACIENTE_NOT_FOUND.to_string()))?;
    Ok(Json(json!({
        "success": true,
        "paciente": PacienteView::at(paciente, Utc::now().date_naive()),
    })))
}

pub async fn crear(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    session: Session,
    body: Result<Json<PacienteInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(input) = body?;
    let nuevo = input.into_nuevo(Utc::now().date_naive())?;
    let id = state.pacientes.create(nuevo).await?;
    info!(id, by = user.id, "paciente created");
    flash(&user, &session, "Paciente creado exitosamente").await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mensaje": "Paciente creado exitosamente",
            "pacienteId": id,
        })),
    ))
}

pub async fn actualizar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    session: Session,
    Path(id): Path<i64>,
    body: Result<Json<PacienteInput>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(input) = body?;
    let actual = state
        .pacientes
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(PACIENTE_NOT_FOUND.to_string()))?;
    let datos = input.merge(actual, Utc::now().date_naive())?;
    if !state.pacientes.update(id, datos).await? {
        return Err(AppError::NotFound(PACIENTE_NOT_FOUND.to_string()));
    }
    flash(&user, &session, "Paciente actualizado exitosamente").await?;
    Ok(Json(json!({
        "success": true,
        "mensaje": "Paciente actualizado exitosamente",
    })))
}

/// Admin only. Measurements of the patient go with it.
pub async fn eliminar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    session: Session,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !state.pacientes.delete(id).await? {
        return Err(AppError::NotFound(PACIENTE_NOT_FOUND.to_string()));
    }
    info!(id, by = user.id, "paciente deleted");
    flash(&user, &session, "Paciente eliminado exitosamente").await?;
    Ok(Json(json!({
        "success": true,
        "mensaje": "Paciente eliminado exitosamente",
    })))
}
