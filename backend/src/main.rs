//! Taskdeck server entry-point: loads settings, prepares storage and the
//! token secret, then serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use taskdeck::inbound::http::health::HealthState;
use taskdeck::outbound::persistence::{DbPool, run_pending_migrations};
use taskdeck::outbound::security::{BuildMode, load_token_secret};

use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let token_secret = load_token_secret(
        settings.token_secret_file(),
        BuildMode::from_debug_assertions(),
        settings.allow_ephemeral_secret,
    )
    .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(settings.bind_addr(), token_secret, settings.token_ttl());

    if let Some(pool_config) = settings.pool_config() {
        run_pending_migrations(pool_config.database_url())
            .await
            .map_err(|e| std::io::Error::other(format!("database migrations failed: {e}")))?;
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting taskdeck server");
    let server = create_server(health_state, config)?;
    server.await
}
