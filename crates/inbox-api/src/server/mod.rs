//! Server setup and initialization
//!
//! Provides the application builders and the server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use inbox_common::{AppConfig, AppError, JwtService};
use inbox_db::{
    create_pool, run_migrations, InMemoryStore, PgHistoryRepository, PgMessageRepository,
    PgMessagingStore, PgNotificationRepository, PgUserRepository,
};
use inbox_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application with the base middleware stack (no rate limiting)
pub fn create_app(state: AppState) -> Router {
    let router = create_router().merge(health_routes());
    apply_middleware(router).with_state(state)
}

/// Build the production application
///
/// Rate limiting and configured CORS wrap the API routes; health probes sit
/// outside them so orchestration never gets throttled.
pub fn create_configured_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        state.is_production(),
    );
    api.merge(health_routes()).with_state(state)
}

/// Connect to PostgreSQL, run migrations and wire every repository
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = inbox_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    info!("Database migrations applied");

    let jwt_service = Arc::new(JwtService::from_config(&config.jwt));

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .message_repo(Arc::new(PgMessageRepository::new(pool.clone())))
        .notification_repo(Arc::new(PgNotificationRepository::new(pool.clone())))
        .history_repo(Arc::new(PgHistoryRepository::new(pool.clone())))
        .store(Arc::new(PgMessagingStore::new(pool)))
        .jwt_service(jwt_service)
        .messaging(config.messaging.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Wire every port to one shared in-memory store
///
/// Used by the integration tests and for running without a database.
pub fn create_memory_app_state(config: AppConfig, store: InMemoryStore) -> Result<AppState, AppError> {
    let jwt_service = Arc::new(JwtService::from_config(&config.jwt));

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(store.clone()))
        .message_repo(Arc::new(store.clone()))
        .notification_repo(Arc::new(store.clone()))
        .history_repo(Arc::new(store.clone()))
        .store(Arc::new(store))
        .jwt_service(jwt_service)
        .messaging(config.messaging.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Serve `app` on an already bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Listener has no local address: {e}")))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API_HOST/API_PORT: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_configured_app(state);

    info!("Starting HTTP server on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    run_server(app, listener).await
}
