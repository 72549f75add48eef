//! Cookie-bound server-side sessions: the signed-in identity plus one-shot
//! flash messages.

use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::SessionConfig;
use crate::models::database::{FlashKind, Flashes, UsuarioPublico, SESSION_USER_KEY};

pub const SESSION_COOKIE: &str = "appSalud.sid";

pub fn session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    let inactivity = time::Duration::seconds(config.ttl.num_seconds());
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.secure_cookie)
        .with_expiry(Expiry::OnInactivity(inactivity))
}

/// Binds `usuario` to the session under a fresh id.
pub async fn start_session(
    session: &Session,
    usuario: &UsuarioPublico,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, usuario).await
}

pub async fn session_user(
    session: &Session,
) -> Result<Option<UsuarioPublico>, tower_sessions::session::Error> {
    session.get(SESSION_USER_KEY).await
}

/// Drops the record server-side; the layer then expires the cookie.
pub async fn end_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

pub async fn set_flash(
    session: &Session,
    kind: FlashKind,
    text: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let text: String = text.into();
    session.insert(kind.key(), text).await
}

/// Reads and clears both flash slots.
pub async fn take_flashes(session: &Session) -> Result<Flashes, tower_sessions::session::Error> {
    Ok(Flashes {
        mensaje: session.remove(FlashKind::Info.key()).await?,
        error: session.remove(FlashKind::Error.key()).await?,
    })
}
