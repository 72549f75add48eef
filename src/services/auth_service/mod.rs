// src/services/auth_service/mod.rs

pub mod password;
pub mod register_user;
pub mod session;
pub mod token;
pub mod verify_user;

pub use password::{PasswordError, PasswordHasher, MAX_PASSWORD_BYTES};
pub use register_user::register_user;
pub use session::{
    end_session, session_layer, session_user, set_flash, start_session, take_flashes,
    SESSION_COOKIE,
};
pub use token::{TokenClaims, TokenError, TokenIssuer, INVALID_TOKEN_MESSAGE};
pub use verify_user::verify_user_credentials;
