use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::errors::AppResult;
use crate::models::database::UsuarioPublico;
use crate::models::AppState;

/// Admin listing of every account, without password hashes.
pub async fn listar_usuarios(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let usuarios: Vec<UsuarioPublico> = state
        .usuarios
        .list()
        .await?
        .iter()
        .map(UsuarioPublico::from)
        .collect();
    Ok(Json(json!({
        "success": true,
        "total": usuarios.len(),
        "usuarios": usuarios,
    })))
}
