use serde::Serialize;

/// Session key holding the signed-in [`UsuarioPublico`](super::user::UsuarioPublico).
pub const SESSION_USER_KEY: &str = "usuario";

/// Kind of one-shot message kept in the session until the next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
}

impl FlashKind {
    pub fn key(&self) -> &'static str {
        match self {
            FlashKind::Info => "mensaje",
            FlashKind::Error => "error",
        }
    }
}

/// Pending flash messages, one slot per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Flashes {
    pub mensaje: Option<String>,
    pub error: Option<String>,
}
