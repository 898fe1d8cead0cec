use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use agent_ml::MlService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Analyzers over the one embedding provider loaded at startup
    pub service: Arc<MlService>,
}

impl ServerState {
    pub fn new(config: ServerConfig, service: MlService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    /// Loads the ML config named by `config` and builds the service from it
    pub async fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let ml_config = config
            .ml_config()
            .map_err(|err| ServerError::Config(err.to_string()))?;
        let service = MlService::from_config(&ml_config)
            .await
            .map_err(|err| ServerError::Config(err.to_string()))?;
        Ok(Self::new(config, service))
    }
}

/// Embedding model details reported by the readiness check
#[derive(Debug, serde::Serialize)]
pub struct ModelMetadata {
    pub model_name: String,
    pub dimension: usize,
}

impl ServerState {
    pub fn model_metadata(&self) -> ModelMetadata {
        let embedder = self.service.embedder();
        ModelMetadata {
            model_name: embedder.model_name().to_string(),
            dimension: embedder.dimension(),
        }
    }
}
