use once_cell::sync::OnceCell;
use onnxruntime::environment::Environment;
use onnxruntime::ndarray::{Array, Array2};
use onnxruntime::session::Session;
use std::fmt;
use std::sync::Arc;
use tokenizers::Tokenizer;
use vector::l2_normalize_in_place;

use crate::assets::ModelAssets;
use crate::embedder::embed_skipping_blank;
use crate::pool::WorkerPool;
use crate::{Embedder, SemanticConfig, SemanticError};

static ORT_ENV: OnceCell<Environment> = OnceCell::new();

fn ort_environment() -> Result<&'static Environment, SemanticError> {
    ORT_ENV.get_or_try_init(|| {
        Environment::builder()
            .with_name("agent-ml")
            .build()
            .map_err(|e| SemanticError::Inference(e.to_string()))
    })
}

/// Tokenizer and session owned by a single inference worker.
struct LoadedModel {
    tokenizer: Tokenizer,
    session: Session<'static>,
}

impl LoadedModel {
    fn load(assets: &ModelAssets) -> Result<Self, SemanticError> {
        let tokenizer = Tokenizer::from_file(&assets.tokenizer_path)
            .map_err(|e| SemanticError::Inference(e.to_string()))?;

        let session = ort_environment()?
            .new_session_builder()
            .map_err(|e| SemanticError::Inference(e.to_string()))?
            .with_model_from_file(assets.model_path.clone())
            .map_err(|e| SemanticError::Inference(e.to_string()))?;

        tracing::debug!(
            model = %assets.model_path.display(),
            thread = ?std::thread::current().name(),
            "loaded ONNX session"
        );
        Ok(Self { tokenizer, session })
    }
}

/// Local sentence encoder backed by ONNX Runtime and a Hugging Face tokenizer.
///
/// Sessions live on a fixed number of inference workers (`inference_workers`), so memory
/// use does not grow with the number of threads calling [`Embedder::embed_batch`]. Clones
/// share the same workers.
#[derive(Clone)]
pub struct OnnxEmbedder {
    pool: Arc<WorkerPool<LoadedModel>>,
    cfg: Arc<SemanticConfig>,
}

impl fmt::Debug for OnnxEmbedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxEmbedder")
            .field("model_name", &self.cfg.model_name)
            .field("dimension", &self.cfg.dimension)
            .field("workers", &self.pool.size())
            .finish()
    }
}

impl OnnxEmbedder {
    /// Resolves (and if needed downloads) the model assets, then starts the inference
    /// workers. Every worker loads its session before this returns, so a broken model fails
    /// at startup rather than on the first request.
    pub async fn load(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        if cfg.dimension == 0 {
            return Err(SemanticError::InvalidConfig("dimension must be positive".into()));
        }
        if cfg.inference_workers == 0 {
            return Err(SemanticError::InvalidConfig(
                "inference_workers must be positive".into(),
            ));
        }
        let assets = ModelAssets::resolve(cfg).await?;
        let pool = WorkerPool::start("onnx-worker", cfg.inference_workers, {
            let assets = assets.clone();
            move |_| LoadedModel::load(&assets)
        })?;
        tracing::info!(
            model = %cfg.model_name,
            path = %assets.model_path.display(),
            dimension = cfg.dimension,
            workers = cfg.inference_workers,
            "ONNX embedder ready"
        );
        Ok(Self {
            pool: Arc::new(pool),
            cfg: Arc::new(cfg.clone()),
        })
    }

    fn infer(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let cfg = Arc::clone(&self.cfg);
        self.pool.run(move |model| infer_on(model, &cfg, &texts))?
    }
}

fn infer_on(
    model: &mut LoadedModel,
    cfg: &SemanticConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, SemanticError> {
    let mut vectors = if cfg.enable_chunking {
        texts
            .iter()
            .map(|text| embed_chunked(model, cfg, text))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        let batch = encode_documents(&model.tokenizer, texts, cfg.max_sequence_length)?;
        execute_session(&mut model.session, batch)?
    };

    if cfg.normalize {
        for v in &mut vectors {
            l2_normalize_in_place(v);
        }
    }
    Ok(vectors)
}

/// Sliding-window embedding for a single text: split the token ids into overlapping
/// windows, embed every window, then pool the window vectors.
fn embed_chunked(
    model: &mut LoadedModel,
    cfg: &SemanticConfig,
    text: &str,
) -> Result<Vec<f32>, SemanticError> {
    let max_len = cfg.max_sequence_length.max(1);
    let encoding = model
        .tokenizer
        .encode(text, true)
        .map_err(|e| SemanticError::Inference(e.to_string()))?;
    let ids = encoding.get_ids();

    let windows: Vec<String> = if ids.len() <= max_len {
        vec![text.to_string()]
    } else {
        let overlap = (max_len as f32 * cfg.chunk_overlap_ratio.clamp(0.0, 0.9)) as usize;
        let step = (max_len - overlap).max(1);
        let mut out = Vec::new();
        let mut start = 0;
        while start < ids.len() {
            let end = (start + max_len).min(ids.len());
            let piece = model
                .tokenizer
                .decode(&ids[start..end], true)
                .map_err(|e| SemanticError::Inference(e.to_string()))?;
            if !piece.trim().is_empty() {
                out.push(piece);
            }
            if end == ids.len() {
                break;
            }
            start += step;
        }
        out
    };

    if windows.is_empty() {
        return Err(SemanticError::Inference("chunking produced no valid chunks".into()));
    }

    let batch = encode_documents(&model.tokenizer, &windows, max_len)?;
    let window_vectors = execute_session(&mut model.session, batch)?;
    pool_windows(&window_vectors, &cfg.pooling_strategy)
}

impl Embedder for OnnxEmbedder {
    fn model_name(&self) -> &str {
        &self.cfg.model_name
    }

    fn dimension(&self) -> usize {
        self.cfg.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        embed_skipping_blank(texts, self.cfg.dimension, |live| self.infer(live))
    }
}

/// Merges window vectors into one.
fn pool_windows(vectors: &[Vec<f32>], strategy: &str) -> Result<Vec<f32>, SemanticError> {
    let first = vectors
        .first()
        .ok_or_else(|| SemanticError::Inference("no embeddings to pool".into()))?;
    let dim = first.len();

    match strategy {
        "first" => Ok(first.clone()),
        "max" => {
            let mut pooled = first.clone();
            for v in &vectors[1..] {
                for (slot, &val) in pooled.iter_mut().zip(v.iter()) {
                    *slot = slot.max(val);
                }
            }
            Ok(pooled)
        }
        "mean" => {
            let mut pooled = vec![0.0f32; dim];
            for v in vectors {
                for (slot, &val) in pooled.iter_mut().zip(v.iter()) {
                    *slot += val;
                }
            }
            let n = vectors.len() as f32;
            pooled.iter_mut().for_each(|x| *x /= n);
            Ok(pooled)
        }
        other => Err(SemanticError::InvalidConfig(format!(
            "unknown pooling strategy '{other}'"
        ))),
    }
}

/// Padded token ids plus attention mask for one session run.
struct TokenBatch {
    input_ids: Array2<i64>,
    attention_mask: Array2<i64>,
}

fn encode_documents<T>(
    tokenizer: &Tokenizer,
    texts: &[T],
    max_sequence_length: usize,
) -> Result<TokenBatch, SemanticError>
where
    T: AsRef<str>,
{
    let mut rows: Vec<(Vec<i64>, Vec<i64>)> = Vec::with_capacity(texts.len());
    for text in texts {
        let encoding = tokenizer
            .encode(text.as_ref(), true)
            .map_err(|e| SemanticError::Inference(e.to_string()))?;
        let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let mut mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| x as i64)
            .collect();
        if ids.len() != mask.len() {
            return Err(SemanticError::Inference(
                "tokenizer produced mismatched id/mask lengths".into(),
            ));
        }
        ids.truncate(max_sequence_length);
        mask.truncate(max_sequence_length);
        rows.push((ids, mask));
    }

    let seq_len = rows.iter().map(|(ids, _)| ids.len()).max().unwrap_or(0).max(1);
    let batch = rows.len();
    let mut id_storage = Vec::with_capacity(batch * seq_len);
    let mut mask_storage = Vec::with_capacity(batch * seq_len);
    for (ids, mask) in rows {
        let pad = seq_len - ids.len();
        id_storage.extend(ids);
        mask_storage.extend(mask);
        id_storage.extend(std::iter::repeat(0).take(pad));
        mask_storage.extend(std::iter::repeat(0).take(pad));
    }

    let input_ids = Array::from_shape_vec((batch, seq_len), id_storage)
        .map_err(|e| SemanticError::Inference(e.to_string()))?;
    let attention_mask = Array::from_shape_vec((batch, seq_len), mask_storage)
        .map_err(|e| SemanticError::Inference(e.to_string()))?;
    Ok(TokenBatch {
        input_ids,
        attention_mask,
    })
}

fn execute_session(
    session: &mut Session<'static>,
    batch: TokenBatch,
) -> Result<Vec<Vec<f32>>, SemanticError> {
    let (rows, seq_len) = batch.input_ids.dim();
    if rows == 0 {
        return Ok(Vec::new());
    }
    let mask = batch.attention_mask.clone();

    let mut runtime_inputs = Vec::with_capacity(session.inputs.len());
    let mut input_ids = Some(batch.input_ids);
    let mut attention_mask = Some(batch.attention_mask);

    for input in &session.inputs {
        let tensor = match input.name.as_str() {
            "input_ids" => input_ids.take(),
            "attention_mask" => attention_mask.take(),
            "token_type_ids" => Some(Array::from_elem((rows, seq_len), 0_i64)),
            other => {
                return Err(SemanticError::Inference(format!(
                    "unsupported model input '{other}'"
                )))
            }
        }
        .ok_or_else(|| {
            SemanticError::InvalidConfig(format!("model requested `{}` twice", input.name))
        })?;
        runtime_inputs.push(tensor.into_dyn());
    }

    if runtime_inputs.is_empty() {
        return Err(SemanticError::Inference(
            "model did not declare any inputs".into(),
        ));
    }

    let outputs = session
        .run::<i64, f32, _>(runtime_inputs)
        .map_err(|e| SemanticError::Inference(e.to_string()))?;
    let output = outputs
        .into_iter()
        .next()
        .ok_or_else(|| SemanticError::Inference("model returned no outputs".into()))?;

    let shape = output.shape().to_vec();
    let flat: Vec<f32> = output.iter().copied().collect();
    match shape.as_slice() {
        // per-token hidden states: sentence-transformers style mean pooling
        [b, s, hidden] if *b == rows && *s == seq_len => {
            Ok(mean_pool(&flat, &mask, *hidden))
        }
        [b, hidden] if *b == rows => Ok(flat.chunks(*hidden).map(<[f32]>::to_vec).collect()),
        other => Err(SemanticError::Inference(format!(
            "unexpected model output shape {other:?} for batch of {rows}"
        ))),
    }
}

/// Averages token vectors over the positions the attention mask marks as real tokens.
fn mean_pool(flat: &[f32], mask: &Array2<i64>, hidden: usize) -> Vec<Vec<f32>> {
    let (rows, seq_len) = mask.dim();
    let mut out = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut pooled = vec![0.0f32; hidden];
        let mut count = 0usize;
        for pos in 0..seq_len {
            if mask[[row, pos]] == 0 {
                continue;
            }
            count += 1;
            let offset = (row * seq_len + pos) * hidden;
            for (slot, &val) in pooled.iter_mut().zip(&flat[offset..offset + hidden]) {
                *slot += val;
            }
        }
        let denom = count.max(1) as f32;
        pooled.iter_mut().for_each(|x| *x /= denom);
        out.push(pooled);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_pool_ignores_padding() {
        // 2 rows, 3 positions, hidden 2
        let flat = vec![
            1.0, 2.0, 3.0, 4.0, 100.0, 100.0, //
            5.0, 5.0, 7.0, 7.0, 9.0, 9.0,
        ];
        let mask = Array::from_shape_vec((2, 3), vec![1, 1, 0, 1, 1, 1]).unwrap();
        let pooled = mean_pool(&flat, &mask, 2);
        assert_eq!(pooled, vec![vec![2.0, 3.0], vec![7.0, 7.0]]);
    }

    #[test]
    fn mean_pool_all_masked_is_zero() {
        let mask = Array::from_shape_vec((1, 2), vec![0, 0]).unwrap();
        assert_eq!(mean_pool(&[1.0, 1.0], &mask, 1), vec![vec![0.0]]);
    }

    #[test]
    fn pool_windows_strategies() {
        let windows = vec![vec![1.0, 4.0], vec![3.0, 2.0]];
        assert_eq!(pool_windows(&windows, "mean").unwrap(), vec![2.0, 3.0]);
        assert_eq!(pool_windows(&windows, "max").unwrap(), vec![3.0, 4.0]);
        assert_eq!(pool_windows(&windows, "first").unwrap(), vec![1.0, 4.0]);
    }

    #[test]
    fn pool_windows_rejects_unknown_strategy_and_empty_input() {
        assert!(matches!(
            pool_windows(&[vec![1.0]], "median"),
            Err(SemanticError::InvalidConfig(_))
        ));
        assert!(pool_windows(&[], "mean").is_err());
    }

    #[tokio::test]
    async fn load_rejects_zero_dimension() {
        let cfg = SemanticConfig {
            dimension: 0,
            ..Default::default()
        };
        assert!(matches!(
            OnnxEmbedder::load(&cfg).await,
            Err(SemanticError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn load_rejects_zero_workers() {
        let cfg = SemanticConfig {
            inference_workers: 0,
            ..Default::default()
        };
        assert!(matches!(
            OnnxEmbedder::load(&cfg).await,
            Err(SemanticError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires local ONNX + tokenizer assets under models/"]
    async fn real_model_inference() {
        let cfg = SemanticConfig::default();
        let embedder = OnnxEmbedder::load(&cfg).await.expect("model should load");
        let vectors = embedder
            .embed_batch(&["машинное обучение", "нейронные сети", ""])
            .expect("inference should succeed");
        assert_eq!(vectors.len(), 3);
        assert!(vectors.iter().all(|v| v.len() == cfg.dimension));
        assert!(vectors[2].iter().all(|&x| x == 0.0));
        let sim = vector::cosine_similarity(&vectors[0], &vectors[1]).unwrap();
        assert!(sim > 0.3, "related phrases should be close, got {sim}");
    }
}
