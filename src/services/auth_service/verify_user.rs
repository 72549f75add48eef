// src/services/auth_service/verify_user.rs

use tracing::info;

use super::password::PasswordHasher;
use crate::db::UserStore;
use crate::errors::{AppError, AppResult};
use crate::models::api::LoginRequest;
use crate::models::database::Usuario;

pub const BAD_CREDENTIALS: &str = "Credenciales inválidas";

/// Checks a username/password pair. Unknown users and wrong passwords get
/// the same answer.
pub async fn verify_user_credentials(
    usuarios: &dyn UserStore,
    passwords: &PasswordHasher,
    request: LoginRequest,
) -> AppResult<Usuario> {
    let (Some(username), Some(password)) = (
        request.username.filter(|u| !u.trim().is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Username y password son requeridos".to_string(),
        ));
    };

    let Some(usuario) = usuarios.find_by_username(username.trim()).await? else {
        info!(username = %username, "login for unknown user");
        return Err(AppError::Unauthenticated(BAD_CREDENTIALS.to_string()));
    };

    if !passwords.verify(&password, &usuario.password_hash).await {
        info!(id = usuario.id, "login with wrong password");
        return Err(AppError::Unauthenticated(BAD_CREDENTIALS.to_string()));
    }

    Ok(usuario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use crate::models::database::{NuevoUsuario, Role};

    async fn store_with_ana(hasher: &PasswordHasher) -> InMemoryStore {
        let store = InMemoryStore::new();
        UserStore::create(
            &store,
            NuevoUsuario {
                username: "ana".into(),
                password_hash: hasher.hash("secret1").await.unwrap(),
                email: "a@x.com".into(),
                rol: Role::User,
            },
        )
        .await
        .unwrap();
        store
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn correct_password_returns_the_account() {
        let hasher = PasswordHasher::new(4);
        let store = store_with_ana(&hasher).await;
        let usuario = verify_user_credentials(&store, &hasher, login("ana", "secret1"))
            .await
            .unwrap();
        assert_eq!(usuario.username, "ana");
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let hasher = PasswordHasher::new(4);
        let store = store_with_ana(&hasher).await;
        for attempt in [login("ana", "wrong"), login("nadie", "secret1")] {
            let err = verify_user_credentials(&store, &hasher, attempt)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Unauthenticated(ref m) if m == BAD_CREDENTIALS));
        }
    }

    #[tokio::test]
    async fn blank_fields_are_a_validation_error() {
        let hasher = PasswordHasher::new(4);
        let store = store_with_ana(&hasher).await;
        let err = verify_user_credentials(&store, &hasher, login("ana", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
