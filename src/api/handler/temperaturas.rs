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

use super::{ensure_paciente, flash};
use crate::api::middleware::AuthUser;
use crate::errors::{AppError, AppResult};
use crate::models::api::TemperaturaInput;
use crate::models::AppState;

const REGISTRO_NOT_FOUND: &str = "Registro no encontrado";

pub async fn listar(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> AppResult<Json<Value>> {
    let registros = state.temperaturas.list().await?;
    Ok(Json(json!({
        "success": true,
        "total": registros.len(),
        "registros": registros,
    })))
}

pub async fn por_paciente(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(paciente_id): Path<i64>,
) -> AppResult<Json<Value>> {
    ensure_paciente(&state, paciente_id).await?;
    let registros = state.temperaturas.list_by_paciente(paciente_id).await?;
    Ok(Json(json!({
        "success": true,
        "total": registros.len(),
        "registros": registros,
    })))
}

pub async fn obtener(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let registro = state
        .temperaturas
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(REGISTRO_NOT_FOUND.to_string()))?;
    Ok(Json(json!({ "success": true, "registro": registro })))
}

pub async fn crear(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    session: Session,
    body: Result<Json<TemperaturaInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(input) = body?;
    let (paciente_id, medicion) = input.into_nueva(Utc::now())?;
    ensure_paciente(&state, paciente_id).await?;
    let id = state.temperaturas.create(paciente_id, medicion).await?;
    info!(id, paciente_id, by = user.id, "temperatura reading created");
    flash(&user, &session, "Registro de temperatura creado exitosamente").await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mensaje": "Registro de temperatura creado exitosamente",
            "registroId": id,
        })),
    ))
}

pub async fn actualizar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    session: Session,
    Path(id): Path<i64>,
    body: Result<Json<TemperaturaInput>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(input) = body?;
    let actual = state
        .temperaturas
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(REGISTRO_NOT_FOUND.to_string()))?;
    let medicion = input.merge(&actual)?;
    if !state.temperaturas.update(id, medicion).await? {
        return Err(AppError::NotFound(REGISTRO_NOT_FOUND.to_string()));
    }
    flash(&user, &session, "Registro actualizado exitosamente").await?;
    Ok(Json(json!({
        "success": true,
        "mensaje": "Registro actualizado exitosamente",
    })))
}

pub async fn eliminar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    session: Session,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !state.temperaturas.delete(id).await? {
        return Err(AppError::NotFound(REGISTRO_NOT_FOUND.to_string()));
    }
    flash(&user, &session, "Registro eliminado exitosamente").await?;
    Ok(Json(json!({
        "success": true,
        "mensaje": "Registro eliminado exitosamente",
    })))
}
