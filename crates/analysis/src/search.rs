use vector::{cosine_similarity, decode, normalize, VectorError};

use crate::config::{AnalysisConfig, SearchConfig};
use crate::outcome::{BatchReport, ItemOutcome};
use crate::types::{Article, SearchResult};

/// Ranks caller-supplied articles against a query embedding.
///
/// Works purely on vectors the caller already has, so it needs no embedder.
pub struct SemanticSearch {
    config: SearchConfig,
}

impl SemanticSearch {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            config: config.search.clone(),
        }
    }

    /// Result count used when a request does not ask for one.
    pub fn default_max_results(&self) -> usize {
        self.config.max_results
    }

    /// Scores every article as a weighted blend of title and abstract similarity and
    /// returns the best `max_results`. Articles whose embeddings cannot be decoded or
    /// compared are reported as skipped and do not stop the ranking.
    pub fn rank(
        &self,
        query_vector: &[f32],
        articles: &[Article],
        max_results: usize,
    ) -> BatchReport<SearchResult> {
        tracing::info!(
            articles = articles.len(),
            max_results,
            "ranking articles"
        );

        let query = normalize(query_vector);
        let mut report: BatchReport<SearchResult> = articles
            .iter()
            .map(|article| self.score_article(&query, article))
            .collect();

        report.sort_desc_by(|r| r.relevance_score);
        report.accepted.truncate(max_results);
        report
    }

    fn score_article(&self, query: &[f32], article: &Article) -> ItemOutcome<SearchResult> {
        match self.relevance(query, article) {
            Ok(score) => {
                tracing::debug!(document_id = %article.document_id, score, "article scored");
                ItemOutcome::Accepted(SearchResult {
                    document_id: article.document_id.clone(),
                    relevance_score: score,
                    matched_concepts: vec![self.relevance_label(score).to_string()],
                })
            }
            Err(err) => ItemOutcome::Skipped {
                id: article.document_id.clone(),
                reason: err.to_string(),
            },
        }
    }

    fn relevance(&self, query: &[f32], article: &Article) -> Result<f32, VectorError> {
        let title = normalize(&decode(&article.title_embedding)?);
        let abstract_vec = normalize(&decode(&article.abstract_embedding)?);
        let title_sim = cosine_similarity(query, &title)?;
        let abstract_sim = cosine_similarity(query, &abstract_vec)?;
        Ok(self.config.title_weight * title_sim + self.config.abstract_weight * abstract_sim)
    }

    fn relevance_label(&self, score: f32) -> &'static str {
        if score > self.config.high_relevance {
            "высокая релевантность"
        } else if score > self.config.medium_relevance {
            "средняя релевантность"
        } else {
            "низкая релевантность"
        }
    }
}
