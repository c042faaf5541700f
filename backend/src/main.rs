//! Backend entry-point: loads settings, prepares the employee store, and
//! serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use employees::domain::Error;
use employees::inbound::http::health::HealthState;
use employees::outbound::persistence::{DbPool, run_pending_migrations};
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

    let config = match prepare().await {
        Ok(config) => config,
        Err(err) => {
            error!(code = %err.code(), message = err.message(), "startup failed");
            return Err(std::io::Error::other(err.to_string()));
        }
    };

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

fn load_settings() -> Result<ServerSettings, Error> {
    ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| Error::configuration(format!("invalid configuration: {err}")))
}

/// Load settings and turn them into a server configuration, building the pool and
/// applying migrations when a database is configured.
async fn prepare() -> Result<ServerConfig, Error> {
    let settings = load_settings()?;
    let config = ServerConfig::new(settings.bind_addr()?);

    let Some(pool_config) = settings.pool_config() else {
        warn!("no database configured; employee records are kept in memory");
        return Ok(config);
    };

    if settings.run_migrations {
        let applied = run_pending_migrations(pool_config.database_url())
            .await
            .map_err(|err| Error::configuration(err.to_string()))?;
        info!(applied, "database migrations complete");
    }

    let pool = DbPool::new(pool_config)
        .await
        .map_err(|err| Error::configuration(err.to_string()))?;
    Ok(config.with_db_pool(pool))
}
