use std::collections::HashMap;

use semantic::{Embedder, SemanticError};

/// Embedder returning hand-picked vectors; any text not in the table fails to embed.
pub(crate) struct TableEmbedder {
    dimension: usize,
    table: HashMap<String, Vec<f32>>,
}

impl TableEmbedder {
    pub(crate) fn new(dimension: usize) -> Self {
        Self {
            dimension,
            table: HashMap::new(),
        }
    }

    pub(crate) fn with(mut self, text: &str, vector: &[f32]) -> Self {
        assert_eq!(vector.len(), self.dimension, "fixture vector for {text:?}");
        self.table.insert(text.to_string(), vector.to_vec());
        self
    }

    /// Registers a vector of the wrong length, to provoke dimension failures.
    pub(crate) fn with_raw(mut self, text: &str, vector: &[f32]) -> Self {
        self.table.insert(text.to_string(), vector.to_vec());
        self
    }
}

impl Embedder for TableEmbedder {
    fn model_name(&self) -> &str {
        "table"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        texts
            .iter()
            .map(|text| {
                if text.trim().is_empty() {
                    return Ok(vec![0.0; self.dimension]);
                }
                self.table
                    .get(*text)
                    .cloned()
                    .ok_or_else(|| SemanticError::Inference(format!("no vector for {text:?}")))
            })
            .collect()
    }
}
