use crate::SemanticError;

/// A sentence encoder shared read-only across requests.
///
/// Implementations must be safe to call from many threads at once. Blank input
/// (empty or whitespace-only) embeds to the zero vector of [`dimension`](Self::dimension)
/// without touching the model, so any similarity against it comes out as 0.
pub trait Embedder: Send + Sync {
    /// Label of the underlying model.
    fn model_name(&self) -> &str;

    /// Length of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Embeds a batch of texts, one vector per input in input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError>;

    /// Embeds a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| SemanticError::Inference("model returned no outputs".into()))
    }
}

/// Runs `infer` on the non-blank texts only and splices zero vectors back in for the blank ones.
pub(crate) fn embed_skipping_blank<F>(
    texts: &[&str],
    dimension: usize,
    infer: F,
) -> Result<Vec<Vec<f32>>, SemanticError>
where
    F: FnOnce(&[&str]) -> Result<Vec<Vec<f32>>, SemanticError>,
{
    let live: Vec<&str> = texts
        .iter()
        .copied()
        .filter(|t| !t.trim().is_empty())
        .collect();

    let mut inferred = if live.is_empty() {
        Vec::new().into_iter()
    } else {
        let vectors = infer(&live)?;
        if vectors.len() != live.len() {
            return Err(SemanticError::Inference(format!(
                "model returned {} embeddings for {} inputs",
                vectors.len(),
                live.len()
            )));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(SemanticError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }
        vectors.into_iter()
    };

    let mut out = Vec::with_capacity(texts.len());
    for text in texts {
        if text.trim().is_empty() {
            out.push(vec![0.0; dimension]);
        } else {
            out.push(
                inferred
                    .next()
                    .ok_or_else(|| SemanticError::Inference("ran out of embeddings".into()))?,
            );
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_infer(texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
    }

    #[test]
    fn blank_texts_become_zero_vectors() {
        let out = embed_skipping_blank(&["ab", "", "  ", "abcd"], 2, fake_infer).unwrap();
        assert_eq!(out, vec![vec![2.0, 1.0], vec![0.0, 0.0], vec![0.0, 0.0], vec![4.0, 1.0]]);
    }

    #[test]
    fn all_blank_never_calls_model() {
        let out = embed_skipping_blank(&["", "\n"], 3, |_| {
            Err(SemanticError::Inference("should not run".into()))
        })
        .unwrap();
        assert_eq!(out, vec![vec![0.0; 3], vec![0.0; 3]]);
    }

    #[test]
    fn empty_batch_is_empty() {
        assert!(embed_skipping_blank(&[], 3, fake_infer).unwrap().is_empty());
    }

    #[test]
    fn wrong_dimension_is_rejected() {
        let err = embed_skipping_blank(&["abc"], 384, fake_infer).unwrap_err();
        assert!(matches!(
            err,
            SemanticError::DimensionMismatch {
                expected: 384,
                actual: 2
            }
        ));
    }

    #[test]
    fn short_model_output_is_rejected() {
        let err = embed_skipping_blank(&["a", "b"], 2, |_| Ok(vec![vec![1.0, 0.0]])).unwrap_err();
        assert!(err.to_string().contains("1 embeddings for 2 inputs"));
    }
}
