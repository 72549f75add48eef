//! Request-level error taxonomy and its JSON rendering.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;

pub type AppResult<T> = Result<T, AppError>;

/// Message sent to clients for every infrastructure failure.
pub const INTERNAL_MESSAGE: &str = "Error interno del servidor";

/// Client-facing message of a rejected request, attached to the response
/// extensions so outer middleware can reuse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage(pub String);

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input (400).
    #[error("{0}")]
    Validation(String),

    /// No usable session or token (401).
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated but not allowed (403).
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate value on a unique field (400).
    #[error("{0}")]
    Conflict(String),

    /// Store or infrastructure failure (500). The detail is logged, never sent.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Internal(detail) => {
                error!(%detail, "request failed with an internal error");
                INTERNAL_MESSAGE.to_string()
            }
            AppError::Validation(m)
            | AppError::Unauthenticated(m)
            | AppError::Forbidden(m)
            | AppError::NotFound(m)
            | AppError::Conflict(m) => m,
        };
        let mut response =
            (status, Json(json!({ "success": false, "error": message.clone() }))).into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AppError::Conflict("El registro ya existe".to_string()),
            StoreError::MissingReference(_) => {
                AppError::NotFound("Registro relacionado no encontrado".to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Solicitud inválida: {}", rejection.body_text()))
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Internal(format!("session store: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthenticated_and_forbidden_are_distinct() {
        let (status, body) = body_of(AppError::Unauthenticated("no".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = body_of(AppError::Forbidden("no".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn response_carries_the_client_message() {
        let response = AppError::NotFound("Paciente no encontrado".into()).into_response();
        assert_eq!(
            response.extensions().get::<ErrorMessage>(),
            Some(&ErrorMessage("Paciente no encontrado".into()))
        );

        let response = AppError::Internal("pool closed".into()).into_response();
        assert_eq!(
            response.extensions().get::<ErrorMessage>(),
            Some(&ErrorMessage(INTERNAL_MESSAGE.into()))
        );
    }

    #[tokio::test]
    async fn internal_detail_is_not_sent_to_clients() {
        let (status, body) =
            body_of(AppError::Internal("connection refused on 10.0.0.3".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_MESSAGE);
    }

    #[test]
    fn store_timeout_maps_to_internal() {
        let err: AppError = StoreError::Timeout(Duration::from_secs(5)).into();
        assert!(matches!(err, AppError::Internal(_)));

        let err: AppError = StoreError::Conflict("usuarios_username_key".into()).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
