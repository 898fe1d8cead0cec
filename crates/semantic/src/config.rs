use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration describing which model/tokenizer to use and how to post-process vectors.
///
/// # Example
/// ```no_run
/// use semantic::{load_embedder, SemanticConfig};
///
/// # async fn run() -> Result<(), semantic::SemanticError> {
/// let cfg = SemanticConfig {
///     mode: "fast".into(),
///     ..Default::default()
/// };
/// let embedder = load_embedder(&cfg).await?;
/// let vector = embedder.embed("машинное обучение")?;
/// assert_eq!(vector.len(), cfg.dimension);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Inference mode selector: `"onnx"` (local model) or `"fast"` (deterministic stub).
    pub mode: String,
    /// Friendly label reported by the provider.
    pub model_name: String,
    /// Local path where the ONNX file should live (also used as the download target when
    /// [`model_url`](Self::model_url) is provided).
    pub model_path: PathBuf,
    /// Optional HTTPS URL that will be downloaded when [`model_path`](Self::model_path) is missing.
    pub model_url: Option<String>,
    /// Path to `tokenizer.json`. When absent and [`tokenizer_url`](Self::tokenizer_url) is provided we
    /// infer the filename from the URL and place it next to the model file.
    pub tokenizer_path: Option<PathBuf>,
    /// Optional HTTPS URL for fetching the tokenizer on-demand.
    pub tokenizer_url: Option<String>,
    /// Output dimension. Blank texts embed to a zero vector of this size and model output
    /// of any other size is rejected.
    pub dimension: usize,
    /// Normalize every vector to unit length.
    pub normalize: bool,
    /// Token budget per sequence; longer inputs are truncated or chunked.
    pub max_sequence_length: usize,
    /// Split over-long inputs into overlapping windows instead of truncating.
    pub enable_chunking: bool,
    /// Fraction of `max_sequence_length` shared between consecutive windows.
    pub chunk_overlap_ratio: f32,
    /// How window vectors are merged: `"mean"`, `"max"` or `"first"`.
    pub pooling_strategy: String,
    /// Compute device (only `"cpu"` is implemented).
    pub device: String,
    /// Threads that each own one ONNX session. Caps how many copies of the model are
    /// resident no matter how many callers embed concurrently.
    pub inference_workers: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "onnx".into(),
            model_name: "paraphrase-multilingual-MiniLM-L12-v2".into(),
            model_path: PathBuf::from("./models/paraphrase-multilingual-MiniLM-L12-v2/onnx/model.onnx"),
            model_url: None,
            tokenizer_path: Some(PathBuf::from(
                "./models/paraphrase-multilingual-MiniLM-L12-v2/tokenizer.json",
            )),
            tokenizer_url: None,
            dimension: 384,
            normalize: true,
            max_sequence_length: 128,
            enable_chunking: false,
            chunk_overlap_ratio: 0.1,
            pooling_strategy: "mean".into(),
            device: "cpu".into(),
            inference_workers: 2,
        }
    }
}
