//! Workspace umbrella crate for the AI agent ML service.
//!
//! This crate wires one shared embedding provider into the three analyzers so
//! callers (the HTTP server, tests, batch jobs) get every operation behind a
//! single [`MlService`] value.

pub mod config;

pub use analysis::{
    AnalysisConfig, AnalysisError, Article, ArticleAnalysis, Author, BatchReport, Department,
    DepartmentScore, ExpertAnalyzer, ExpertScore, ItemOutcome, QueryAnalysis, SearchResult,
    SemanticSearch, SkippedItem, TopicAnalyzer, TopicTag, TopicType, DEFAULT_QUERY_CONTEXT,
};
pub use config::{ConfigLoadError, MlConfig};
pub use semantic::{load_embedder, Embedder, SemanticConfig, SemanticError, StubEmbedder};
pub use vector::{EmbeddingVector, VectorError};

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Errors that can occur while building an [`MlService`].
#[derive(Debug)]
pub enum MlError {
    Config(ConfigLoadError),
    Model(SemanticError),
}

impl fmt::Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlError::Config(err) => write!(f, "configuration failure: {err}"),
            MlError::Model(err) => write!(f, "embedding model failure: {err}"),
        }
    }
}

impl Error for MlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlError::Config(err) => Some(err),
            MlError::Model(err) => Some(err),
        }
    }
}

impl From<ConfigLoadError> for MlError {
    fn from(value: ConfigLoadError) -> Self {
        MlError::Config(value)
    }
}

impl From<SemanticError> for MlError {
    fn from(value: SemanticError) -> Self {
        MlError::Model(value)
    }
}

/// All analysis operations over one shared embedder.
///
/// Cheap to share behind an `Arc`; every operation takes `&self` and keeps no state
/// between calls.
pub struct MlService {
    embedder: Arc<dyn Embedder>,
    topics: TopicAnalyzer,
    search: SemanticSearch,
    experts: ExpertAnalyzer,
}

impl MlService {
    pub fn new(embedder: Arc<dyn Embedder>, config: &AnalysisConfig) -> Self {
        Self {
            topics: TopicAnalyzer::new(embedder.clone(), config),
            search: SemanticSearch::new(config),
            experts: ExpertAnalyzer::new(embedder.clone(), config),
            embedder,
        }
    }

    /// Validates `config`, loads the embedding provider and builds the analyzers.
    pub async fn from_config(config: &MlConfig) -> Result<Self, MlError> {
        config.validate()?;
        let embedder = load_embedder(&config.semantic).await?;
        tracing::info!(
            model = %embedder.model_name(),
            dimension = embedder.dimension(),
            topics = config.analysis.topics.catalog.len(),
            "ML service initialized"
        );
        Ok(Self::new(embedder, &config.analysis))
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn analyze_article(
        &self,
        document_id: &str,
        title: &str,
        abstract_text: &str,
    ) -> Result<ArticleAnalysis, AnalysisError> {
        self.topics.analyze_article(document_id, title, abstract_text)
    }

    pub fn analyze_query(
        &self,
        query: &str,
        context: Option<&str>,
    ) -> Result<QueryAnalysis, AnalysisError> {
        self.topics.analyze_query(query, context)
    }

    /// Ranks `articles` against `query_vector`; `max_results` falls back to the
    /// configured default.
    pub fn semantic_search(
        &self,
        query_vector: &[f32],
        articles: &[Article],
        max_results: Option<usize>,
    ) -> BatchReport<SearchResult> {
        let limit = max_results.unwrap_or_else(|| self.search.default_max_results());
        self.search.rank(query_vector, articles, limit)
    }

    pub fn analyze_experts(
        &self,
        topic: &str,
        authors: &[Author],
    ) -> Result<BatchReport<ExpertScore>, AnalysisError> {
        self.experts.analyze_experts(topic, authors)
    }

    pub fn analyze_departments(
        &self,
        topic: &str,
        departments: &[Department],
    ) -> Result<BatchReport<DepartmentScore>, AnalysisError> {
        self.experts.analyze_departments(topic, departments)
    }
}
