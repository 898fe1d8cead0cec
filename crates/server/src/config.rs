use agent_ml::MlConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level (any `EnvFilter` directive)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// YAML file with model and analyzer settings; built-in defaults when unset
    #[serde(default)]
    pub ml_config_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            ml_config_path: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional `server.{toml,yaml,json}` file, then
    /// `AGENT_ML__*` environment variables
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(config::Environment::with_prefix("AGENT_ML").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Reads the ML service configuration this server should run with
    pub fn ml_config(&self) -> anyhow::Result<MlConfig> {
        match &self.ml_config_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading ML config");
                Ok(MlConfig::from_file(path)?)
            }
            None => Ok(MlConfig::default()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_body_size_mb, 10);
        assert_eq!(cfg.max_body_size(), 10 * 1024 * 1024);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert!(cfg.enable_cors);
        assert!(cfg.ml_config_path.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn test_bad_bind_addr() {
        let cfg = ServerConfig {
            bind_addr: "not an ip".into(),
            ..Default::default()
        };
        assert!(cfg.socket_addr().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: ServerConfig =
            serde_json::from_str(r#"{"port": 9000, "ml_config_path": "ml.yaml"}"#).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.ml_config_path, Some(PathBuf::from("ml.yaml")));
    }

    #[test]
    fn test_ml_config_defaults_without_path() {
        let cfg = ServerConfig::default();
        let ml = cfg.ml_config().unwrap();
        assert_eq!(ml.version, "1.0");
    }

    #[test]
    fn test_ml_config_missing_file_is_error() {
        let cfg = ServerConfig {
            ml_config_path: Some(PathBuf::from("/no/such/ml.yaml")),
            ..Default::default()
        };
        assert!(cfg.ml_config().is_err());
    }
}
