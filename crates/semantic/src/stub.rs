use fxhash::hash64;
use vector::l2_normalize_in_place;

use crate::embedder::embed_skipping_blank;
use crate::{Embedder, SemanticConfig, SemanticError};

/// Deterministic provider used in `"fast"` mode or when the model assets are unavailable.
/// Generates sinusoid values derived from a hash of the input text to guarantee reproducible
/// vectors with minimal CPU cost. Carries no semantics: two paraphrases land far apart.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    model_name: String,
    dimension: usize,
    normalize: bool,
}

impl StubEmbedder {
    pub fn new(dimension: usize, normalize: bool) -> Self {
        Self {
            model_name: "stub".into(),
            dimension,
            normalize,
        }
    }

    pub fn from_config(cfg: &SemanticConfig) -> Self {
        Self {
            model_name: format!("{}-stub", cfg.model_name),
            dimension: cfg.dimension,
            normalize: cfg.normalize,
        }
    }

    fn make_vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dimension];
        let h = hash64(text.as_bytes());
        for (idx, value) in v.iter_mut().enumerate() {
            *value = ((h >> (idx % 32)) as f32 * 0.0001).sin();
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

impl Embedder for StubEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        embed_skipping_blank(texts, self.dimension, |live| {
            Ok(live.iter().map(|text| self.make_vector(text)).collect())
        })
    }
}
