//! Server initialization and routing
//!
//! Router assembly, the middleware stack and graceful shutdown.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::middleware::{log_requests, request_id};
use crate::routes::{analysis, experts, health, search};
use crate::routes::{api_info, not_found};
use crate::state::ServerState;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{BoxError, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Outermost first: trace, request id, request logging, CORS, compression,
/// timeout, body limit.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let health_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check));

    let api = Router::new()
        .route("/api/analyze-article", post(analysis::analyze_article))
        .route("/api/analyze-query", post(analysis::analyze_query))
        .route("/api/semantic-search", post(search::semantic_search))
        .route("/api/analyze-experts", post(experts::analyze_experts))
        .route(
            "/api/analyze-departments",
            post(experts::analyze_departments),
        )
        .layer(DefaultBodyLimit::max(state.config.max_body_size()));

    Router::new()
        .merge(health_routes)
        .merge(api)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(state.config.timeout()),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> ServerError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ServerError::Timeout
    } else {
        ServerError::Internal(err.to_string())
    }
}

/// Start the HTTP server
///
/// Installs JSON logging at `config.log_level`, loads the embedding model and
/// analyzers, binds the configured address and serves until SIGTERM or Ctrl+C.
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    let addr: SocketAddr = config.socket_addr()?;
    let state = Arc::new(ServerState::from_config(config.clone()).await?);
    let model = state.model_metadata();

    let app = build_router(state);

    tracing::info!(
        %addr,
        model = %model.model_name,
        dimension = model.dimension,
        "Starting AI agent ML server"
    );
    tracing::info!(
        timeout_secs = config.timeout_secs,
        max_body_size_mb = config.max_body_size_mb,
        cors = config.enable_cors,
        "Server limits"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
