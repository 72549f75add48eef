use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account role. Stored and serialized lowercase (`user`, `admin`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("rol desconocido: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A stored account, including its password hash.
///
/// Not `Serialize`; anything leaving the process goes through
/// [`UsuarioPublico`].
#[derive(Clone)]
pub struct Usuario {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub rol: Role,
}

impl fmt::Debug for Usuario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Usuario")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("rol", &self.rol)
            .finish()
    }
}

/// Public projection of an account: what sessions hold and responses carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsuarioPublico {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub rol: Role,
}

impl From<&Usuario> for UsuarioPublico {
    fn from(usuario: &Usuario) -> Self {
        UsuarioPublico {
            id: usuario.id,
            username: usuario.username.clone(),
            email: usuario.email.clone(),
            rol: usuario.rol,
        }
    }
}

/// Insert payload for the credential store. The hash is computed before
/// this is built; the plaintext never reaches storage.
#[derive(Debug, Clone)]
pub struct NuevoUsuario {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub rol: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_and_prints_lowercase() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("Admin".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn debug_output_hides_password_hash() {
        let usuario = Usuario {
            id: 1,
            username: "ana".into(),
            email: "a@x.com".into(),
            password_hash: "$2b$10$secret".into(),
            rol: Role::User,
        };
        let printed = format!("{:?}", usuario);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
