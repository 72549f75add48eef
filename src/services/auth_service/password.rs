//! bcrypt password hashing. Work runs on the blocking pool so a login never
//! stalls the async workers.

use thiserror::Error;
use tokio::task;
use tracing::warn;

use crate::errors::AppError;

/// bcrypt only reads this many bytes; longer inputs are refused instead of
/// being silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password longer than {MAX_PASSWORD_BYTES} bytes")]
    TooLong,

    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("hashing task failed: {0}")]
    Task(#[from] task::JoinError),
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooLong => AppError::Validation(format!(
                "La contraseña no puede superar {} bytes",
                MAX_PASSWORD_BYTES
            )),
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        PasswordHasher { cost }
    }

    /// Salted, self-describing `$2b$` hash of `plaintext`.
    pub async fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        let cost = self.cost;
        let plaintext = plaintext.to_owned();
        let hashed = task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
        Ok(hashed)
    }

    /// Fails closed: any error is logged and reported as a mismatch.
    pub async fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        let plaintext = plaintext.to_owned();
        let hashed = hashed.to_owned();
        match task::spawn_blocking(move || bcrypt::verify(plaintext, &hashed)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(err)) => {
                warn!(error = %err, "stored password hash could not be checked");
                false
            }
            Err(err) => {
                warn!(error = %err, "password verification task failed");
                false
            }
        }
    }
}
