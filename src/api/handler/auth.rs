// src/api/handler/auth.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Extension, Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::models::api::{AuthResponse, LoginRequest, RegistroRequest, VerificarResponse};
use crate::models::database::{FlashKind, Flashes, UsuarioPublico};
use crate::models::AppState;
use crate::services::auth_service::{
    end_session, register_user, session_user, set_flash, start_session, verify_user_credentials,
};

pub async fn registro(
    State(state): State<Arc<AppState>>,
    session: Session,
    body: Result<Json<RegistroRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let Json(request) = body?;
    let usuario = register_user(state.usuarios.as_ref(), &state.passwords, request).await?;
    let token = state.tokens.issue(&usuario)?;

    start_session(&session, &usuario).await?;
    set_flash(
        &session,
        FlashKind::Info,
        "¡Registro exitoso! Por favor inicia sesión",
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            mensaje: "Usuario registrado exitosamente",
            token,
            usuario,
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(request) = body?;
    let usuario = verify_user_credentials(state.usuarios.as_ref(), &state.passwords, request).await?;
    let usuario = UsuarioPublico::from(&usuario);
    let token = state.tokens.issue(&usuario)?;

    start_session(&session, &usuario).await?;
    set_flash(&session, FlashKind::Info, "¡Login exitoso!").await?;
    info!(id = usuario.id, username = %usuario.username, "login succeeded");

    Ok(Json(AuthResponse {
        success: true,
        mensaje: "Login exitoso",
        token,
        usuario,
    }))
}

/// Session-only check; bearer tokens are not consulted here.
pub async fn verificar(session: Session) -> AppResult<Json<VerificarResponse>> {
    let response = match session_user(&session).await? {
        Some(usuario) => VerificarResponse {
            success: true,
            autenticado: true,
            usuario: Some(usuario),
            error: None,
        },
        None => VerificarResponse {
            success: false,
            autenticado: false,
            usuario: None,
            error: Some("No autenticado"),
        },
    };
    Ok(Json(response))
}

pub async fn usuario_actual(session: Session) -> AppResult<Json<Value>> {
    let usuario = session_user(&session)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Usuario no autenticado".to_string()))?;
    Ok(Json(json!({ "success": true, "usuario": usuario })))
}

pub async fn logout(session: Session) -> AppResult<Json<Value>> {
    end_session(&session).await?;
    Ok(Json(json!({
        "success": true,
        "mensaje": "Sesión cerrada exitosamente",
    })))
}

/// Browser variant of logout.
pub async fn logout_redirect(session: Session) -> AppResult<impl IntoResponse> {
    end_session(&session).await?;
    Ok(Redirect::to("/"))
}

/// Messages pending when this request started; the flash layer has already
/// removed them from the session.
pub async fn mensajes(Extension(flashes): Extension<Flashes>) -> Json<Value> {
    Json(json!({
        "success": true,
        "mensaje": flashes.mensaje,
        "error": flashes.error,
    }))
}
