//! # Analysis (`analysis`)
//!
//! The scoring side of the ML service. Three analyzers share one embedding
//! provider and turn embeddings into answers:
//!
//! - [`TopicAnalyzer`]: tags titles and abstracts with topics from a fixed
//!   catalog, merges title/abstract tags, and cleans up user queries.
//! - [`SemanticSearch`]: ranks caller-supplied articles against a query vector
//!   with a weighted title/abstract cosine score.
//! - [`ExpertAnalyzer`]: scores authors and departments against a topic string.
//!
//! Batch operations never abort on a single bad item. Each item produces an
//! [`ItemOutcome`]; the batch returns a [`BatchReport`] holding the accepted
//! records and the items that had to be skipped, with a reason. Only failures
//! that make the whole request meaningless (the query topic cannot be embedded)
//! come back as [`AnalysisError`].
//!
//! All thresholds and weights live in [`AnalysisConfig`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use analysis::{AnalysisConfig, Author, ExpertAnalyzer};
//! use semantic::StubEmbedder;
//!
//! let embedder = Arc::new(StubEmbedder::new(384, true));
//! let experts = ExpertAnalyzer::new(embedder, &AnalysisConfig::default());
//!
//! let authors = vec![Author {
//!     author_id: "a-1".into(),
//!     article_ids: vec!["doc-1".into()],
//!     article_topics: vec!["машинное обучение".into()],
//! }];
//! let report = experts.analyze_experts("машинное обучение", &authors).unwrap();
//! assert_eq!(report.accepted[0].author_id, "a-1");
//! ```

pub mod config;
mod error;
mod experts;
mod outcome;
mod search;
mod topics;
mod types;

#[cfg(test)]
mod test_support;

pub use crate::config::{AnalysisConfig, ExpertConfig, SearchConfig, TopicConfig};
pub use crate::error::AnalysisError;
pub use crate::experts::ExpertAnalyzer;
pub use crate::outcome::{BatchReport, ItemOutcome, SkippedItem};
pub use crate::search::SemanticSearch;
pub use crate::topics::{TopicAnalyzer, DEFAULT_QUERY_CONTEXT};
pub use crate::types::{
    Article, ArticleAnalysis, Author, Department, DepartmentScore, ExpertScore, QueryAnalysis,
    SearchResult, TopicTag, TopicType,
};
