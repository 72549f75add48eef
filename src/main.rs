use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use app_salud::{build_router, utils::init_tracing, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(&config.log);

    if config.auth.using_default_secret {
        warn!("JWT_SECRET not set, signing tokens with the built-in default secret");
    }
    if !config.session.secure_cookie {
        warn!("session cookie is sent without the Secure flag");
    }

    let state = AppState::from_config(&config)
        .await
        .context("failed to initialise storage")?;
    let app = build_router(Arc::new(state));

    let addr = config.server.addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
