//! # Event Scheduling API
//!
//! Web server in front of the scheduling service. It exposes the event
//! operations as JSON endpoints.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into scheduling requests
//! - **Middleware**: Caller identity and error mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Storage is reached only through
//! the [`SchedulingService`] held in [`ApiState`].

/// Configuration module for API settings
pub mod config;
/// Request and response bodies
pub mod dto;
/// Request handlers
pub mod handlers;
/// Middleware for caller identity and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eventsched_core::{
    instrumentation::{InstrumentedEventRepository, InstrumentedSchedulingService},
    service::{EventService, SchedulingService},
};
use eventsched_db::{DbPool, PgEventRepository};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub service: Arc<dyn SchedulingService>,
}

impl ApiState {
    pub fn new(service: Arc<dyn SchedulingService>) -> Self {
        Self { service }
    }
}

/// Wires the PostgreSQL repository into the scheduling service.
///
/// With `trace_spans` set, both the repository and the service are wrapped
/// in their tracing decorators.
pub fn build_service(pool: DbPool, trace_spans: bool) -> Arc<dyn SchedulingService> {
    let repository = PgEventRepository::new(pool);

    if trace_spans {
        let service = EventService::new(InstrumentedEventRepository::new(repository));
        Arc::new(InstrumentedSchedulingService::new(service))
    } else {
        Arc::new(EventService::new(repository))
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Event management endpoints
        .merge(routes::event::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Installs the global `fmt` subscriber at `level`.
///
/// Call once, before anything logs. Fails if a subscriber is already set.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("failed to install tracing subscriber")?;
    Ok(())
}

/// Starts the API server with the provided configuration and database connection
///
/// Builds the service stack and serves until Ctrl-C. Logging is expected
/// to be set up already through [`init_tracing`].
///
/// # Example
///
/// ```rust,ignore
/// let config = ApiConfig::from_env()?;
/// init_tracing(config.log_level)?;
/// let pool = eventsched_db::create_pool(&config.database_url, config.database_max_connections).await?;
/// start_server(config, pool).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    let service = build_service(db_pool, config.trace_spans);
    let app = router(Arc::new(ApiState::new(service)));

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .into_inner(),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
