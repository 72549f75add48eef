// src/services/auth_service/register_user.rs

use tracing::info;

use super::password::PasswordHasher;
use crate::db::{StoreError, UserStore};
use crate::errors::{AppError, AppResult};
use crate::models::api::RegistroRequest;
use crate::models::database::{NuevoUsuario, Role, UsuarioPublico};

pub const USERNAME_TAKEN: &str = "El nombre de usuario ya está en uso";

/// Creates an account and returns its public projection.
///
/// Uniqueness is enforced by the store. Of two racing registrations for the
/// same username, the loser gets the same `Conflict` as a plain duplicate.
pub async fn register_user(
    usuarios: &dyn UserStore,
    passwords: &PasswordHasher,
    request: RegistroRequest,
) -> AppResult<UsuarioPublico> {
    let (Some(username), Some(password), Some(email)) = (
        present(request.username),
        request.password.filter(|p| !p.is_empty()),
        present(request.email),
    ) else {
        return Err(AppError::Validation(
            "Username, password y email son requeridos".to_string(),
        ));
    };

    let rol = match present(request.rol) {
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|_| AppError::Validation("Rol inválido".to_string()))?,
        None => Role::default(),
    };

    if usuarios.find_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let password_hash = passwords.hash(&password).await?;
    let nuevo = NuevoUsuario {
        username,
        password_hash,
        email,
        rol,
    };
    let publico = UsuarioPublico {
        id: 0,
        username: nuevo.username.clone(),
        email: nuevo.email.clone(),
        rol,
    };

    let id = match usuarios.create(nuevo).await {
        Ok(id) => id,
        Err(StoreError::Conflict(_)) => {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    info!(id, username = %publico.username, rol = %rol, "user registered");
    Ok(UsuarioPublico { id, ..publico })
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
