use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{routes, state::ServerState};
use models::db::{connect_with_config, DatabaseConfig};
use service::spaceship::{repository::SeaOrmSpaceshipRepository, seed::seed_default_fleet, SpaceshipService};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_from_env();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

/// Connect, migrate, build the cached service and seed it when enabled.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = connect_with_config(&DatabaseConfig::from(&cfg.database)).await?;
    migration::Migrator::up(&db, None).await?;
    info!(event = "migrated", "database schema up to date");

    let repo = Arc::new(SeaOrmSpaceshipRepository::new(db));
    let spaceships = SpaceshipService::new(repo, &cfg.cache);
    if cfg.seed.enabled {
        seed_default_fleet(&spaceships).await?;
    }
    Ok(ServerState::new(spaceships))
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = AppConfig::load_or_env()?;
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    // Bind and serve
    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "starting spaceship api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(event = "stopped", "http server drained");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}
