//! HTTP REST API for the AI agent ML service
//!
//! Exposes the topic, search and expert analyzers of [`agent_ml::MlService`]
//! as JSON endpoints. The embedding model is loaded once at startup and shared
//! by every request; analysis runs on the blocking thread pool.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - service information
//! - `GET /health` - liveness check
//! - `GET /ready` - readiness check with the loaded model
//! - `POST /api/analyze-article` - topic tags and embeddings for an article
//! - `POST /api/analyze-query` - interpreted query, key concepts and query vector
//! - `POST /api/semantic-search` - rank articles against a query vector
//! - `POST /api/analyze-experts` - score authors against a topic
//! - `POST /api/analyze-departments` - score departments against a topic
//!
//! Errors are returned as `{"error": {"code": ..., "message": ...}}`.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
