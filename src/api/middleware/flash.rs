//! One-shot flash messages, request-scoped.
//!
//! Pending messages are pulled out of the session when a request starts, so
//! whatever the request does not show is gone afterwards.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;
use tracing::warn;

use super::auth_gate::{AuthSource, AuthUser};
use crate::errors::{AppResult, ErrorMessage};
use crate::models::database::FlashKind;
use crate::services::auth_service::{set_flash, take_flashes};

/// Must run inside the session layer. Handlers read the taken messages with
/// `Extension<Flashes>`.
pub async fn load_flashes(
    session: Session,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let flashes = take_flashes(&session).await?;
    request.extensions_mut().insert(flashes);
    Ok(next.run(request).await)
}

/// Keeps the message of a rejected record request as an error flash for
/// session callers. Runs inside the auth gate.
pub async fn flash_failures(
    user: AuthUser,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if user.source != AuthSource::Session {
        return response;
    }
    if !matches!(
        response.status(),
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND
    ) {
        return response;
    }
    let message = response
        .extensions()
        .get::<ErrorMessage>()
        .map(|ErrorMessage(m)| m.clone());
    if let Some(message) = message {
        if let Err(err) = set_flash(&session, FlashKind::Error, message).await {
            warn!(error = %err, "could not store error flash");
        }
    }
    response
}
