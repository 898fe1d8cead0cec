//! YAML configuration for the ML service
//!
//! One file describes the embedding provider and every analyzer threshold.
//! Anything left out falls back to the built-in defaults, so the smallest valid
//! file is just the version line.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "production"
//!
//! semantic:
//!   mode: "onnx"
//!   model_name: "paraphrase-multilingual-MiniLM-L12-v2"
//!   model_path: "./models/paraphrase-multilingual-MiniLM-L12-v2/onnx/model.onnx"
//!   tokenizer_path: "./models/paraphrase-multilingual-MiniLM-L12-v2/tokenizer.json"
//!   dimension: 384
//!   normalize: true
//!
//! analysis:
//!   topics:
//!     catalog: ["машинное обучение", "биоинформатика", "экология"]
//!     relevance_threshold: 0.3
//!   stop_words:
//!     article_search: ["статьи", "публикации", "работы", "про"]
//!   search:
//!     title_weight: 0.6
//!     abstract_weight: 0.4
//!     max_results: 10
//!   experts:
//!     placeholder_activity_year: 2023
//! ```

use std::fs;
use std::path::Path;

use analysis::{AnalysisConfig, AnalysisError};
use semantic::SemanticConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading the YAML configuration file
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

impl From<AnalysisError> for ConfigLoadError {
    fn from(err: AnalysisError) -> Self {
        ConfigLoadError::Validation(err.to_string())
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MlConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Embedding provider
    #[serde(default)]
    pub semantic: SemanticConfig,

    /// Analyzer thresholds, weights, catalog and stop words
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl MlConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: MlConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        if self.semantic.dimension == 0 {
            return Err(ConfigLoadError::Validation(
                "semantic.dimension must be greater than zero".into(),
            ));
        }
        if !matches!(self.semantic.mode.as_str(), "onnx" | "fast") {
            return Err(ConfigLoadError::Validation(format!(
                "semantic.mode must be \"onnx\" or \"fast\", got '{}'",
                self.semantic.mode
            )));
        }

        self.analysis.validate()?;
        Ok(())
    }
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            semantic: SemanticConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}
