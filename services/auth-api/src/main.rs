//! Gatehouse Auth API
//!
//! Authentication microservice: role-scoped join/login, refresh-token
//! rotation, and principal deactivation over REST.

mod config;
mod error;
mod extractors;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use gatehouse_auth_core::AuthService;
use gatehouse_store::{create_pool, Repositories, SessionRepository};

use crate::config::Config;
use crate::state::{AppState, SweeperHandle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Gatehouse Auth API");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to the database
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    let repos = Repositories::new(pool.clone());

    // Build the auth service
    let auth = AuthService::new(
        config.auth.clone(),
        Arc::new(repos.principals.clone()),
        Arc::new(repos.sessions.clone()),
    );

    // Sweep expired and revoked sessions in the background
    let sweeper = SweeperHandle::default();
    let sweeper_repo = repos.sessions.clone();
    let sweeper_marker = sweeper.clone();
    let sweep_interval = config.session_sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            match sweeper_repo.delete_expired().await {
                Ok(n) => {
                    if n > 0 {
                        tracing::info!(deleted = n, "Swept expired sessions");
                    }
                    sweeper_marker.mark();
                }
                Err(e) => tracing::warn!(error = %e, "Session sweep failed"),
            }
        }
    });

    let http_port = config.http_port;
    let app_state = AppState::new(auth, repos, pool, sweeper, config);

    // Build router
    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/api/v1/auth/:role/join", post(handlers::join))
        .route("/api/v1/auth/:role/login", post(handlers::login))
        .route("/api/v1/auth/refresh", post(handlers::refresh))
        .route("/api/v1/auth/logout", post(handlers::logout))
        .route(
            "/api/v1/auth/:role/principals/:id",
            delete(handlers::deactivate),
        )
        .route("/api/v1/auth/me", get(handlers::me))
        .route("/api/v1/auth/sessions", get(handlers::sessions))
        .with_state(app_state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
