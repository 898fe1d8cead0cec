//! Sentence embeddings for the ML service
//!
//! This crate turns short Russian (or any multilingual) texts into fixed-length
//! dense vectors. Everything downstream (topic tagging, search ranking, expert
//! scoring) only ever talks to the [`Embedder`] trait, so the model behind it can
//! be swapped without touching the analyzers.
//!
//! Two providers ship with the crate:
//!
//! - **ONNX mode** - Runs `paraphrase-multilingual-MiniLM-L12-v2` (or whatever you
//!   point it at) locally. Needs the `.onnx` file and a `tokenizer.json`; both can be
//!   downloaded on first start if URLs are configured.
//! - **Fast mode** - Deterministic hash-based vectors. No model files, no semantics.
//!   Good for tests and for bringing the service up on a laptop.
//!
//! If the model files are missing and there is nothing to download them from,
//! [`load_embedder`] logs a warning and hands back the fast provider instead of
//! failing startup.
//!
//! ## Threading notes
//!
//! ONNX sessions are not `Send`, so each one is owned by a dedicated inference worker.
//! `inference_workers` fixes how many exist; callers on any thread queue their batch and
//! block until a worker returns it. The [`OnnxEmbedder`] value itself is cheap to share.
//!
//! ## Quick example
//!
//! ```no_run
//! use semantic::{load_embedder, SemanticConfig};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cfg = SemanticConfig {
//!         model_path: PathBuf::from("models/minilm/model.onnx"),
//!         tokenizer_path: Some(PathBuf::from("models/minilm/tokenizer.json")),
//!         ..Default::default()
//!     };
//!
//!     let embedder = load_embedder(&cfg).await.unwrap();
//!     let vectors = embedder.embed_batch(&["нейронные сети", "глубокое обучение"]).unwrap();
//!     assert_eq!(vectors[0].len(), embedder.dimension());
//! }
//! ```

pub mod config;
pub mod error;

mod assets;
mod embedder;
mod onnx;
mod pool;
mod stub;

use std::sync::Arc;

pub use crate::config::SemanticConfig;
pub use crate::embedder::Embedder;
pub use crate::error::SemanticError;
pub use crate::onnx::OnnxEmbedder;
pub use crate::stub::StubEmbedder;

/// Builds the provider selected by `cfg.mode`.
///
/// `"fast"` returns the stub immediately. `"onnx"` resolves the model assets and starts
/// the inference workers. If the assets are missing and no URL is configured the stub is
/// returned instead; a failed download or a model that fails to load is reported.
pub async fn load_embedder(cfg: &SemanticConfig) -> Result<Arc<dyn Embedder>, SemanticError> {
    match cfg.mode.as_str() {
        "fast" => {
            tracing::info!(dimension = cfg.dimension, "using deterministic stub embedder");
            Ok(Arc::new(StubEmbedder::from_config(cfg)))
        }
        "onnx" => match OnnxEmbedder::load(cfg).await {
            Ok(embedder) => Ok(Arc::new(embedder)),
            Err(err) if err.is_missing_asset() => {
                tracing::warn!(
                    error = %err,
                    model = %cfg.model_name,
                    "model assets unavailable, falling back to stub embedder"
                );
                Ok(Arc::new(StubEmbedder::from_config(cfg)))
            }
            Err(err) => Err(err),
        },
        other => Err(SemanticError::InvalidConfig(format!(
            "unknown embedding mode '{other}' (expected \"onnx\" or \"fast\")"
        ))),
    }
}
