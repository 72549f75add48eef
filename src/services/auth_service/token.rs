//! Stateless HS256 identity tokens.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;
use crate::models::database::{Role, UsuarioPublico};

/// Message sent for every rejected token, whatever the reason.
pub const INVALID_TOKEN_MESSAGE: &str = "Token inválido o expirado.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: i64,
    pub username: String,
    pub rol: Role,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed, or expired.
    #[error("invalid or expired token")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AppError::Unauthenticated(INVALID_TOKEN_MESSAGE.to_string()),
            TokenError::Signing(e) => AppError::Internal(format!("token signing: {}", e)),
        }
    }
}

/// Issues and checks tokens against one shared secret. Rotating the secret
/// invalidates every outstanding token; there is no per-token revocation.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: TimeDelta) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        TokenIssuer {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, usuario: &UsuarioPublico) -> Result<String, TokenError> {
        self.issue_at(usuario, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        usuario: &UsuarioPublico,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims {
            id: usuario.id,
            username: usuario.username.clone(),
            rol: usuario.rol,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Checks signature and expiry. Never consults a store.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "token rejected");
                TokenError::Invalid
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> UsuarioPublico {
        UsuarioPublico {
            id: 7,
            username: "ana".into(),
            email: "a@x.com".into(),
            rol: Role::User,
        }
    }

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(secret, TimeDelta::hours(24))
    }

    #[test]
    fn issued_token_verifies_with_claims() {
        let tokens = issuer("test-secret");
        let token = tokens.issue(&ana()).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.username, "ana");
        assert_eq!(claims.rol, Role::User);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = issuer("test-secret");
        let token = tokens
            .issue_at(&ana(), Utc::now() - TimeDelta::hours(25))
            .unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn token_still_inside_its_window_is_accepted() {
        let tokens = issuer("test-secret");
        let token = tokens
            .issue_at(&ana(), Utc::now() - TimeDelta::hours(23))
            .unwrap();
        assert!(tokens.verify(&token).is_ok());
    }

    #[test]
    fn different_issue_times_give_different_tokens() {
        let tokens = issuer("test-secret");
        let now = Utc::now();
        let a = tokens.issue_at(&ana(), now).unwrap();
        let b = tokens.issue_at(&ana(), now + TimeDelta::seconds(1)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_secret_and_tampering_are_rejected() {
        let token = issuer("test-secret").issue(&ana()).unwrap();
        assert!(issuer("rotated").verify(&token).is_err());

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1].push('A');
        let tampered = parts.join(".");
        assert!(issuer("test-secret").verify(&tampered).is_err());

        assert!(issuer("test-secret").verify("not.a.token").is_err());
        assert!(issuer("test-secret").verify("").is_err());
    }
}
