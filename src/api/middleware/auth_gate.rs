//! Resolves who is calling, from the session cookie or a bearer token, and
//! attaches the answer to the request.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::database::{Role, UsuarioPublico};
use crate::models::AppState;
use crate::services::auth_service::session_user;

pub const NO_CREDENTIAL: &str = "Acceso denegado. Token no proporcionado.";
pub const UNKNOWN_USER: &str = "Usuario no encontrado.";
pub const NOT_AUTHENTICATED: &str = "Usuario no autenticado";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthSource {
    Session,
    Token,
}

/// The resolved caller. Handlers take it as an extractor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub rol: Role,
    pub source: AuthSource,
}

impl AuthUser {
    fn from_publico(usuario: UsuarioPublico, source: AuthSource) -> Self {
        AuthUser {
            id: usuario.id,
            username: usuario.username,
            email: usuario.email,
            rol: usuario.rol,
            source,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated(NOT_AUTHENTICATED.to_string()))
    }
}

/// What the caller presented.
#[derive(Debug, Clone, PartialEq)]
pub enum Credential {
    Session(UsuarioPublico),
    Bearer(String),
}

impl Credential {
    /// A live session wins over any `Authorization` header.
    pub async fn from_request(
        session: &Session,
        headers: &HeaderMap,
    ) -> AppResult<Option<Credential>> {
        if let Some(usuario) = session_user(session).await? {
            return Ok(Some(Credential::Session(usuario)));
        }
        Ok(bearer_token(headers).map(Credential::Bearer))
    }

    pub async fn resolve(self, state: &AppState) -> AppResult<AuthUser> {
        match self {
            Credential::Session(usuario) => {
                Ok(AuthUser::from_publico(usuario, AuthSource::Session))
            }
            Credential::Bearer(token) => {
                let claims = state.tokens.verify(&token)?;
                // Role and email come from the store, not from the token.
                let usuario = state
                    .usuarios
                    .find_by_id(claims.id)
                    .await?
                    .ok_or_else(|| AppError::Unauthenticated(UNKNOWN_USER.to_string()))?;
                Ok(AuthUser::from_publico(
                    UsuarioPublico::from(&usuario),
                    AuthSource::Token,
                ))
            }
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

pub async fn auth_gate(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let Some(credential) = Credential::from_request(&session, request.headers()).await? else {
        return Err(AppError::Unauthenticated(NO_CREDENTIAL.to_string()));
    };
    let user = credential.resolve(&state).await?;
    debug!(id = user.id, rol = %user.rol, source = ?user.source, "request authenticated");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
