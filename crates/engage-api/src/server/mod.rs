//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use engage_common::{AppConfig, AppError};
use engage_db::{
    create_pool, run_migrations, PgBroadcastRepository, PgChannelAccountRepository,
    PgContentStore, PgCustomerDirectory, PgCustomerTagRepository, PgHealthCheck,
    PgImmediateRepository, PgInboundLogRepository, PgOutboxRepository, PgRuleRepository,
};
use engage_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health probes get the base stack only so they are never rate limited.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let timeout = Duration::from_secs(config.api.request_timeout_secs);

    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
        timeout,
    );
    let health = apply_middleware(health_routes(), timeout);

    api.merge(health).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = engage_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    info!("Database migrations applied");

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .rule_repo(Arc::new(PgRuleRepository::new(pool.clone())))
        .inbound_log_repo(Arc::new(PgInboundLogRepository::new(pool.clone())))
        .outbox_repo(Arc::new(PgOutboxRepository::new(pool.clone())))
        .broadcast_repo(Arc::new(PgBroadcastRepository::new(pool.clone())))
        .channel_account_repo(Arc::new(PgChannelAccountRepository::new(pool.clone())))
        .immediate_repo(Arc::new(PgImmediateRepository::new(pool.clone())))
        .customer_directory(Arc::new(PgCustomerDirectory::new(pool.clone())))
        .customer_tag_repo(Arc::new(PgCustomerTagRepository::new(pool.clone())))
        .content_store(Arc::new(PgContentStore::new(pool.clone())))
        .health_check(Arc::new(PgHealthCheck::new(pool)))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
