use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::api::middleware::AuthUser;
use crate::errors::AppError;

pub async fn status() -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "online",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn protegido(user: AuthUser) -> Json<Value> {
    Json(json!({
        "success": true,
        "mensaje": "Ruta protegida accesible",
        "usuario": user,
    }))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Ruta no encontrada".to_string())
}
