use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::future::{BoxFuture, FutureExt};

use super::auth_gate::{AuthUser, NOT_AUTHENTICATED};
use crate::errors::{AppError, AppResult};
use crate::models::database::Role;

pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

pub const FORBIDDEN_MESSAGE: &str = "No tienes permisos para realizar esta acción";

pub fn authorize(user: Option<&AuthUser>, allowed: &[Role]) -> AppResult<()> {
    let Some(user) = user else {
        return Err(AppError::Unauthenticated(NOT_AUTHENTICATED.to_string()));
    };
    if allowed.contains(&user.rol) {
        Ok(())
    } else {
        Err(AppError::Forbidden(FORBIDDEN_MESSAGE.to_string()))
    }
}

/// Middleware for `axum::middleware::from_fn`. Must sit inside the auth
/// gate, which is what puts the [`AuthUser`] on the request.
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(Request, Next) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static {
    move |request: Request, next: Next| {
        async move {
            let verdict = authorize(request.extensions().get::<AuthUser>(), allowed);
            match verdict {
                Ok(()) => next.run(request).await,
                Err(err) => err.into_response(),
            }
        }
        .boxed()
    }
}
