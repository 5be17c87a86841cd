//! Plenum server binary
//!
//! Loads configuration, connects to PostgreSQL, wires repositories
//! into the HTTP endpoint groups, and serves the API.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use plenum::adapters::http::{
    decision_router, docket_router, session_router, DecisionAppState, DocketAppState,
    SessionAppState,
};
use plenum::adapters::memory::{InMemoryDecisionTextRegistry, InMemoryEventBus, InMemoryMemberRegistry};
use plenum::adapters::postgres::{
    PostgresDecisionRepository, PostgresDocketEntryRepository, PostgresSessionRepository,
};
use plenum::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "starting plenum"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let session_repository = Arc::new(PostgresSessionRepository::new(pool.clone()));
    let entry_repository = Arc::new(PostgresDocketEntryRepository::new(pool.clone()));
    let decision_repository = Arc::new(PostgresDecisionRepository::new(pool));
    let member_registry = Arc::new(InMemoryMemberRegistry::new());
    let text_registry = Arc::new(InMemoryDecisionTextRegistry::new());
    let event_publisher = Arc::new(InMemoryEventBus::new());

    let session_state = SessionAppState {
        session_repository: session_repository.clone(),
        entry_repository: entry_repository.clone(),
        member_registry: member_registry.clone(),
        event_publisher: event_publisher.clone(),
    };
    let docket_state = DocketAppState {
        session_repository,
        entry_repository: entry_repository.clone(),
        member_registry,
        text_registry,
        event_publisher: event_publisher.clone(),
    };
    let decision_state = DecisionAppState {
        entry_repository,
        decision_repository,
        event_publisher,
    };

    let app = Router::new()
        .merge(session_router().with_state(session_state))
        .merge(docket_router().with_state(docket_state))
        .merge(decision_router().with_state(decision_state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
