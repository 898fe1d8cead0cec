use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use semantic::{Embedder, SemanticError};
use vector::{cosine_similarity, EmbeddingVector};

use crate::config::{AnalysisConfig, TopicConfig};
use crate::types::{ArticleAnalysis, QueryAnalysis, TopicTag, TopicType};
use crate::AnalysisError;

/// Context assumed when a query arrives without one.
pub const DEFAULT_QUERY_CONTEXT: &str = "article_search";

/// Tags text with catalog topics and turns user queries into search input.
pub struct TopicAnalyzer {
    embedder: Arc<dyn Embedder>,
    config: TopicConfig,
    stop_words: HashMap<String, HashSet<String>>,
}

impl TopicAnalyzer {
    pub fn new(embedder: Arc<dyn Embedder>, config: &AnalysisConfig) -> Self {
        let stop_words = config
            .stop_words
            .iter()
            .map(|(context, words)| {
                (
                    context.clone(),
                    words.iter().map(|w| w.to_lowercase()).collect(),
                )
            })
            .collect();
        Self {
            embedder,
            config: config.topics.clone(),
            stop_words,
        }
    }

    /// The configured topic labels.
    pub fn catalog(&self) -> &[String] {
        &self.config.catalog
    }

    /// Scores `text` against every label of `catalog` and keeps the best matches.
    ///
    /// Blank text embeds to the zero vector, which is similar to nothing, so the
    /// result is empty.
    pub fn tag(&self, text: &str, catalog: &[String]) -> Result<Vec<TopicTag>, AnalysisError> {
        let text_vec = self.embedder.embed(text)?;
        let labels = self.embed_labels(catalog)?;
        self.tags_for(&text_vec, catalog, &labels)
    }

    /// Merges title and abstract tags into one short list.
    ///
    /// Duplicates inside the title list keep the higher confidence; a title topic that
    /// shows up again in the abstract gets the average of the two. Each entry keeps
    /// the `topic_type` it was first seen with.
    pub fn combine(&self, title_tags: &[TopicTag], abstract_tags: &[TopicTag]) -> Vec<TopicTag> {
        let mut merged: Vec<TopicTag> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();

        for tag in title_tags {
            match slots.get(tag.topic_name.as_str()) {
                Some(&idx) => {
                    merged[idx].confidence = merged[idx].confidence.max(tag.confidence);
                }
                None => {
                    slots.insert(&tag.topic_name, merged.len());
                    merged.push(tag.clone());
                }
            }
        }
        for tag in abstract_tags {
            match slots.get(tag.topic_name.as_str()) {
                Some(&idx) => {
                    merged[idx].confidence = (merged[idx].confidence + tag.confidence) / 2.0;
                }
                None => {
                    slots.insert(&tag.topic_name, merged.len());
                    merged.push(tag.clone());
                }
            }
        }

        sort_by_confidence(&mut merged);
        merged.truncate(self.config.max_combined);
        merged
    }

    /// Lowercases `query` and drops the stop words of `context`. Unknown contexts
    /// have no stop words.
    pub fn interpret_query(&self, query: &str, context: &str) -> String {
        let lowered = query.to_lowercase();
        let stop = self.stop_words.get(context);
        lowered
            .split_whitespace()
            .filter(|word| !stop.is_some_and(|set| set.contains(*word)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Picks the longer words of an interpreted query, in order.
    pub fn extract_concepts(&self, interpreted_query: &str) -> Vec<String> {
        interpreted_query
            .split_whitespace()
            .filter(|word| word.chars().count() > self.config.min_concept_chars)
            .take(self.config.max_concepts)
            .map(str::to_string)
            .collect()
    }

    /// Tags title and abstract against the configured catalog and returns the merged
    /// topics with both embeddings.
    pub fn analyze_article(
        &self,
        document_id: &str,
        title: &str,
        abstract_text: &str,
    ) -> Result<ArticleAnalysis, AnalysisError> {
        tracing::info!(document_id = %document_id, "analyzing article topics");

        let embedded = self.embedder.embed_batch(&[title, abstract_text])?;
        let [title_vec, abstract_vec]: [Vec<f32>; 2] =
            embedded.try_into().map_err(|got: Vec<Vec<f32>>| {
                SemanticError::Inference(format!("expected 2 embeddings, got {}", got.len()))
            })?;

        let catalog = &self.config.catalog;
        let labels = self.embed_labels(catalog)?;
        let title_tags = self.tags_for(&title_vec, catalog, &labels)?;
        let abstract_tags = self.tags_for(&abstract_vec, catalog, &labels)?;
        let topics = self.combine(&title_tags, &abstract_tags);

        tracing::debug!(
            document_id = %document_id,
            title_tags = title_tags.len(),
            abstract_tags = abstract_tags.len(),
            combined = topics.len(),
            "article topics merged"
        );

        Ok(ArticleAnalysis {
            topics,
            title_embedding: EmbeddingVector::new(title_vec),
            abstract_embedding: EmbeddingVector::new(abstract_vec),
        })
    }

    /// Interprets a user query and embeds the interpreted form.
    pub fn analyze_query(
        &self,
        query: &str,
        context: Option<&str>,
    ) -> Result<QueryAnalysis, AnalysisError> {
        let context = context.unwrap_or(DEFAULT_QUERY_CONTEXT);
        tracing::info!(context = %context, "analyzing user query");

        let interpreted_query = self.interpret_query(query, context);
        let key_concepts = self.extract_concepts(&interpreted_query);
        let query_vector = self.embedder.embed(&interpreted_query)?;

        Ok(QueryAnalysis {
            interpreted_query,
            key_concepts,
            query_vector: EmbeddingVector::new(query_vector),
            query_type: context.to_string(),
        })
    }

    fn embed_labels(&self, catalog: &[String]) -> Result<Vec<Vec<f32>>, AnalysisError> {
        let refs: Vec<&str> = catalog.iter().map(String::as_str).collect();
        Ok(self.embedder.embed_batch(&refs)?)
    }

    fn tags_for(
        &self,
        text_vec: &[f32],
        catalog: &[String],
        labels: &[Vec<f32>],
    ) -> Result<Vec<TopicTag>, AnalysisError> {
        let mut tags = Vec::new();
        for (name, label_vec) in catalog.iter().zip(labels) {
            let similarity = cosine_similarity(text_vec, label_vec)?;
            if similarity > self.config.relevance_threshold {
                let topic_type = if similarity > self.config.main_threshold {
                    TopicType::Main
                } else {
                    TopicType::Secondary
                };
                tags.push(TopicTag {
                    topic_name: name.clone(),
                    confidence: similarity,
                    topic_type,
                });
            }
        }
        sort_by_confidence(&mut tags);
        tags.truncate(self.config.max_tags);
        Ok(tags)
    }
}

fn sort_by_confidence(tags: &mut [TopicTag]) {
    tags.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TableEmbedder;

    fn analyzer(embedder: TableEmbedder) -> TopicAnalyzer {
        TopicAnalyzer::new(Arc::new(embedder), &AnalysisConfig::default())
    }

    fn tag(name: &str, confidence: f32, topic_type: TopicType) -> TopicTag {
        TopicTag {
            topic_name: name.into(),
            confidence,
            topic_type,
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn tag_keeps_relevant_topics_in_order() {
        let embedder = TableEmbedder::new(3)
            .with("нейросети", &[1.0, 0.0, 0.0])
            .with("exact", &[1.0, 0.0, 0.0])
            .with("close", &[0.6, 0.8, 0.0])
            .with("weak", &[0.2, 0.0, 0.98])
            .with("far", &[0.0, 1.0, 0.0]);
        let tags = analyzer(embedder)
            .tag("нейросети", &labels(&["far", "close", "weak", "exact"]))
            .unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].topic_name, "exact");
        assert_eq!(tags[0].topic_type, TopicType::Main);
        assert!((tags[0].confidence - 1.0).abs() < 1e-5);
        assert_eq!(tags[1].topic_name, "close");
        assert_eq!(tags[1].topic_type, TopicType::Secondary);
        assert!((tags[1].confidence - 0.6).abs() < 1e-5);
    }

    #[test]
    fn tag_caps_at_five() {
        let mut embedder = TableEmbedder::new(2).with("text", &[1.0, 0.0]);
        let names: Vec<String> = (0..8).map(|i| format!("label-{i}")).collect();
        for (i, name) in names.iter().enumerate() {
            embedder = embedder.with(name, &[1.0, i as f32 * 0.1]);
        }
        let tags = analyzer(embedder).tag("text", &names).unwrap();
        assert_eq!(tags.len(), 5);
        assert_eq!(tags[0].topic_name, "label-0");
        assert!(tags.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert!(tags.iter().all(|t| t.confidence > 0.3));
    }

    #[test]
    fn tag_blank_text_is_empty() {
        let embedder = TableEmbedder::new(2).with("label", &[1.0, 0.0]);
        assert!(analyzer(embedder).tag("   ", &labels(&["label"])).unwrap().is_empty());
    }

    #[test]
    fn tag_propagates_provider_failure() {
        let embedder = TableEmbedder::new(2).with("label", &[1.0, 0.0]);
        let err = analyzer(embedder).tag("unknown text", &labels(&["label"])).unwrap_err();
        assert!(matches!(err, AnalysisError::Embedding(_)));
    }

    #[test]
    fn combine_averages_shared_topics_and_caps_at_three() {
        let topics = analyzer(TableEmbedder::new(1));
        let title = vec![
            tag("A", 0.8, TopicType::Main),
            tag("B", 0.5, TopicType::Secondary),
        ];
        let abstract_tags = vec![
            tag("A", 0.4, TopicType::Secondary),
            tag("C", 0.7, TopicType::Secondary),
            tag("D", 0.35, TopicType::Secondary),
        ];
        let combined = topics.combine(&title, &abstract_tags);

        assert_eq!(combined.len(), 3);
        assert_eq!(combined[0].topic_name, "C");
        assert_eq!(combined[1].topic_name, "A");
        assert!((combined[1].confidence - 0.6).abs() < 1e-6);
        assert_eq!(combined[1].topic_type, TopicType::Main);
        assert_eq!(combined[2].topic_name, "B");
    }

    #[test]
    fn combine_title_duplicates_keep_max() {
        let topics = analyzer(TableEmbedder::new(1));
        let title = vec![
            tag("A", 0.4, TopicType::Secondary),
            tag("A", 0.9, TopicType::Main),
        ];
        let combined = topics.combine(&title, &[]);
        assert_eq!(combined.len(), 1);
        assert!((combined[0].confidence - 0.9).abs() < 1e-6);
        assert_eq!(combined[0].topic_type, TopicType::Secondary);
    }

    #[test]
    fn combine_abstract_duplicates_average_repeatedly() {
        let topics = analyzer(TableEmbedder::new(1));
        let abstract_tags = vec![
            tag("A", 0.4, TopicType::Secondary),
            tag("A", 0.8, TopicType::Main),
        ];
        let combined = topics.combine(&[], &abstract_tags);
        assert!((combined[0].confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn interpret_query_drops_context_stop_words() {
        let topics = analyzer(TableEmbedder::new(1));
        let out = topics.interpret_query("найти статьи про машинное обучение", "article_search");
        assert_eq!(out, "найти машинное обучение");
        assert!(!out.contains("статьи"));

        let out = topics.interpret_query("Найди  ЭКСПЕРТОВ по нейросетям", "expert_search");
        assert_eq!(out, "по нейросетям");
    }

    #[test]
    fn interpret_query_unknown_context_only_normalizes() {
        let topics = analyzer(TableEmbedder::new(1));
        assert_eq!(
            topics.interpret_query("  Статьи ПРО  графы ", "unknown"),
            "статьи про графы"
        );
    }

    #[test]
    fn extract_concepts_counts_characters_not_bytes() {
        let topics = analyzer(TableEmbedder::new(1));
        // "сеть" is 4 characters but 8 bytes; "про" is 3 characters
        assert_eq!(
            topics.extract_concepts("про сеть ии данные"),
            vec!["сеть".to_string(), "данные".to_string()]
        );
    }

    #[test]
    fn extract_concepts_caps_at_five() {
        let topics = analyzer(TableEmbedder::new(1));
        let concepts = topics.extract_concepts("alpha bravo charlie delta echoes foxtrot golf");
        assert_eq!(concepts, vec!["alpha", "bravo", "charlie", "delta", "echoes"]);
    }

    #[test]
    fn analyze_query_embeds_interpreted_text() {
        let embedder = TableEmbedder::new(2).with("машинное обучение", &[0.0, 1.0]);
        let analysis = analyzer(embedder)
            .analyze_query("Статьи про машинное обучение", None)
            .unwrap();
        assert_eq!(analysis.interpreted_query, "машинное обучение");
        assert_eq!(analysis.key_concepts, vec!["машинное", "обучение"]);
        assert_eq!(analysis.query_vector.as_slice(), &[0.0, 1.0]);
        assert_eq!(analysis.query_type, "article_search");
    }

    #[test]
    fn analyze_article_merges_title_and_abstract() {
        let mut cfg = AnalysisConfig::default();
        cfg.topics.catalog = labels(&["ml", "bio"]);
        let embedder = TableEmbedder::new(2)
            .with("ml", &[1.0, 0.0])
            .with("bio", &[0.0, 1.0])
            .with("title", &[1.0, 0.0])
            .with("abstract", &[0.8, 0.6]);
        let topics = TopicAnalyzer::new(Arc::new(embedder), &cfg);

        let analysis = topics.analyze_article("doc-1", "title", "abstract").unwrap();
        assert_eq!(analysis.title_embedding.as_slice(), &[1.0, 0.0]);
        assert_eq!(analysis.abstract_embedding.as_slice(), &[0.8, 0.6]);

        // ml: title 1.0 averaged with abstract 0.8; bio only matches the abstract
        assert_eq!(analysis.topics.len(), 2);
        assert_eq!(analysis.topics[0].topic_name, "ml");
        assert!((analysis.topics[0].confidence - 0.9).abs() < 1e-5);
        assert_eq!(analysis.topics[0].topic_type, TopicType::Main);
        assert_eq!(analysis.topics[1].topic_name, "bio");
        assert!((analysis.topics[1].confidence - 0.6).abs() < 1e-5);
        assert_eq!(analysis.topics[1].topic_type, TopicType::Secondary);
    }
}
