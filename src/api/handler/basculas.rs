// src/api/handler/basculas.rs

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
use crate::models::api::{BasculaInput, BasculaView};
use crate::models::database::Bascula;
use crate::models::AppState;

const REGISTRO_NOT_FOUND: &str = "Registro no encontrado";

pub async fn listar(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> AppResult<Json<Value>> {
    let registros: Vec<BasculaView> = state
        .basculas
        .list()
        .await?
        .into_iter()
        .map(BasculaView::from)
        .collect();
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
    let registros: Vec<BasculaView> = state
        .basculas
        .list_by_paciente(paciente_id)
        .await?
        .into_iter()
        .map(BasculaView::from)
        .collect();
    Ok(Json(json!({
        "success": true,
        "total": registros.len(),
        "registros": registros,
    })))
}

pub async fn ultima(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(paciente_id): Path<i64>,
) -> AppResult<Json<Value>> {
    ensure_paciente(&state, paciente_id).await?;
    let body = match state.basculas.latest_for_paciente(paciente_id).await? {
        Some(registro) => json!({
            "success": true,
            "registro": BasculaView::from(registro),
        }),
        None => json!({
            "success": true,
            "registro": null,
            "mensaje": "No hay registros para este paciente",
        }),
    };
    Ok(Json(body))
}

pub async fn obtener(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let registro = state
        .basculas
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(REGISTRO_NOT_FOUND.to_string()))?;
    Ok(Json(json!({
        "success": true,
        "registro": BasculaView::from(registro),
    })))
}

pub async fn crear(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    session: Session,
    body: Result<Json<BasculaInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Json(input) = body?;
    let (paciente_id, medicion) = input.into_nueva(Utc::now())?;
    ensure_paciente(&state, paciente_id).await?;

    let id = state.basculas.create(paciente_id, medicion.clone()).await?;
    info!(id, paciente_id, by = user.id, "bascula reading created");
    flash(&user, &session, "Registro de peso creado exitosamente").await?;

    let vista = BasculaView::from(Bascula {
        id,
        paciente_id,
        peso: medicion.peso,
        altura: medicion.altura,
        fecha_registro: medicion.fecha_registro,
    });
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mensaje": "Registro de peso creado exitosamente",
            "registroId": id,
            "imc": vista.imc,
            "clasificacion": vista.clasificacion,
        })),
    ))
}

pub async fn actualizar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    session: Session,
    Path(id): Path<i64>,
    body: Result<Json<BasculaInput>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(input) = body?;
    let actual = state
        .basculas
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(REGISTRO_NOT_FOUND.to_string()))?;
    let medicion = input.merge(&actual)?;
    if !state.basculas.update(id, medicion.clone()).await? {
        return Err(AppError::NotFound(REGISTRO_NOT_FOUND.to_string()));
    }
    flash(&user, &session, "Registro actualizado exitosamente").await?;

    let vista = BasculaView::from(Bascula {
        peso: medicion.peso,
        altura: medicion.altura,
        fecha_registro: medicion.fecha_registro,
        ..actual
    });
    Ok(Json(json!({
        "success": true,
        "mensaje": "Registro actualizado exitosamente",
        "imc": vista.imc,
        "clasificacion": vista.clasificacion,
    })))
}

pub async fn eliminar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    session: Session,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !state.basculas.delete(id).await? {
        return Err(AppError::NotFound(REGISTRO_NOT_FOUND.to_string()));
    }
    flash(&user, &session, "Registro eliminado exitosamente").await?;
    Ok(Json(json!({
        "success": true,
        "mensaje": "Registro eliminado exitosamente",
    })))
}
